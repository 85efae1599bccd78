mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mdx", version, about = "Incremental indexing and search for markdown vaults")]
pub struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/mdindex/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    /// Vault root; when given, no config file is needed
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Directory holding the durable index
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep the index in memory for this run only
    #[arg(long, global = true, env = "MDINDEX_IN_MEMORY")]
    in_memory: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bring the index up to date with the vault
    Reindex(ReindexArgs),

    /// Reindex, then search documents by text and tags
    Search(SearchArgs),

    /// Show what the index currently holds
    Status,
}

#[derive(Debug, Args)]
pub struct ReindexArgs {
    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for in document content
    pub query: Option<String>,

    /// Required tag (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Require every --tag instead of any of them
    #[arg(long)]
    pub all_tags: bool,

    /// Only documents whose path starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Print matching paths only
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Quiet,
}

fn main() {
    let cli = Cli::parse();

    let rc = cmd::resolve_config(&cli);
    logging::init(&rc, cli.verbose);

    match cli.command {
        Commands::Reindex(args) => cmd::reindex::run(&rc, args),
        Commands::Search(args) => cmd::search::run(&rc, args),
        Commands::Status => cmd::status::run(&rc),
    }
}

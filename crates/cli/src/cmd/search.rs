//! Search command implementation.

use mdindex_core::config::ResolvedConfig;
use mdindex_core::index::{SearchEngine, SearchQuery, TagFilter};

use super::open_index;
use super::output::print_documents;
use crate::{OutputFormat, SearchArgs};

/// Run the search command. The index is brought up to date first.
pub fn run(rc: &ResolvedConfig, args: SearchArgs) {
    let db = open_index(rc);
    let stats = super::reindex(&db, rc, None);
    for skipped in &stats.skipped {
        eprintln!("Warning: skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    let format = resolve_format(args.output, args.json, args.quiet);
    let query = build_query(args);

    let engine = SearchEngine::new(&db);
    let results = match engine.search(&query) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error searching: {}", e);
            std::process::exit(1);
        }
    };

    print_documents(&results, format);
}

fn build_query(args: SearchArgs) -> SearchQuery {
    let tags = if args.tags.is_empty() {
        None
    } else if args.all_tags {
        Some(TagFilter::All(args.tags))
    } else {
        Some(TagFilter::Any(args.tags))
    };

    SearchQuery { text: args.query, tags, path_prefix: args.prefix, limit: args.limit }
}

/// Resolve the output format from flags.
fn resolve_format(output: OutputFormat, json: bool, quiet: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if quiet {
        OutputFormat::Quiet
    } else {
        output
    }
}

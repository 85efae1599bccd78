pub mod output;
pub mod reindex;
pub mod search;
pub mod status;

use mdindex_core::config::{ConfigLoader, ResolvedConfig};
use mdindex_core::index::{IndexBuilder, IndexDb, IndexStats, ProgressCallback};

use crate::Cli;

/// Resolve the active configuration, applying command-line overrides.
///
/// With `--vault` and no `--config`, no config file is read.
pub fn resolve_config(cli: &Cli) -> ResolvedConfig {
    let mut rc = match (&cli.vault, &cli.config) {
        (Some(vault), None) => ResolvedConfig::for_vault(vault),
        _ => match ConfigLoader::load(cli.config.as_deref(), cli.profile.as_deref()) {
            Ok(rc) => rc,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                if cli.vault.is_none() {
                    eprintln!("Hint: pass --vault <DIR> to index a directory without a config file.");
                }
                std::process::exit(1);
            }
        },
    };

    // A vault given alongside a config file replaces the profile's vault.
    if let (Some(vault), Some(_)) = (&cli.vault, &cli.config) {
        rc = rc.with_vault_root(vault);
    }
    if let Some(ref dir) = cli.data_dir {
        rc.data_dir = dir.clone();
    }
    rc.in_memory |= cli.in_memory;

    rc
}

/// Open the store the configuration selects, exiting on failure.
pub fn open_index(rc: &ResolvedConfig) -> IndexDb {
    match IndexDb::from_config(rc) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening index: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run one incremental pass over the configured vault, exiting on failure.
pub fn reindex(db: &IndexDb, rc: &ResolvedConfig, progress: Option<ProgressCallback>) -> IndexStats {
    let builder =
        IndexBuilder::new(db, &rc.vault_root).with_exclusions(rc.walker_exclusions());
    match builder.reindex(progress) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Error during indexing: {}", e);
            std::process::exit(1);
        }
    }
}

/// Human-readable location of the store.
pub fn index_location(rc: &ResolvedConfig) -> String {
    if rc.in_memory {
        "(in memory)".to_string()
    } else {
        rc.data_dir.join(mdindex_core::index::INDEX_FILE_NAME).display().to_string()
    }
}

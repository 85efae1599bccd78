//! Reindex command implementation.

use std::io::Write;

use mdindex_core::config::ResolvedConfig;
use mdindex_core::index::ProgressCallback;

use super::output::print_stats;
use super::{index_location, open_index};
use crate::ReindexArgs;

/// Run the reindex command.
pub fn run(rc: &ResolvedConfig, args: ReindexArgs) {
    let db = open_index(rc);

    let progress: Option<ProgressCallback> = if args.json {
        None
    } else {
        println!("Indexing vault: {}", rc.vault_root.display());
        Some(Box::new(|current, total, _path| {
            if current % 50 == 0 || current == total {
                print!("\rIndexing... {}/{}", current, total);
                std::io::stdout().flush().ok();
            }
        }))
    };

    let stats = super::reindex(&db, rc, progress);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats).unwrap_or_default());
        return;
    }

    if stats.documents_written > 0 {
        println!(); // Newline after progress
    }
    println!();
    println!("Indexing complete:");
    print_stats(&stats);
    println!();
    println!("Index stored at: {}", index_location(rc));
}

//! Status command implementation.

use mdindex_core::config::ResolvedConfig;

use super::{index_location, open_index};

/// Print what the index currently holds, without reindexing.
pub fn run(rc: &ResolvedConfig) {
    let db = open_index(rc);

    let (count, version) = match db.count_documents().and_then(|c| Ok((c, db.schema_version()?))) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error reading index: {}", e);
            std::process::exit(1);
        }
    };

    println!("Profile:         {}", rc.active_profile);
    println!("Vault:           {}", rc.vault_root.display());
    println!("Index:           {}", index_location(rc));
    match version {
        Some(v) => println!("Schema version:  {}", v),
        None => println!("Schema version:  (not initialised)"),
    }
    println!("Documents:       {}", count);
}

//! SQLite schema definition and the reset-on-change version policy.
//!
//! There are no incremental migrations: the index only holds data derived from
//! the vault, so any version change drops everything and the next pass
//! repopulates it from disk.

use rusqlite::Connection;
use thiserror::Error;

use super::db::{IndexDb, IndexError};

/// Shape of the document records this build reads and writes.
pub const SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Index error: {0}")]
    Store(#[from] IndexError),
}

/// Bring the store to `expected`, discarding all documents when the recorded
/// version is absent, different, or unreadable.
///
/// Returns whether a reset happened.
pub fn ensure_current_schema(db: &IndexDb, expected: i32) -> Result<bool, SchemaError> {
    let stored = match db.schema_version() {
        Ok(version) => version,
        Err(e) if e.is_corrupt() => {
            tracing::warn!("Schema version record is unreadable, resetting index: {}", e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    if stored == Some(expected) {
        return Ok(false);
    }

    match stored {
        Some(found) => tracing::info!(
            "Index schema version {} differs from {}, rebuilding index",
            found,
            expected
        ),
        None => tracing::info!("Initialising index schema version {}", expected),
    }

    reset_schema(db, expected)?;
    Ok(true)
}

/// Drop every document and the version record, then record `version`.
pub fn reset_schema(db: &IndexDb, version: i32) -> Result<(), IndexError> {
    db.transaction(|db| {
        db.reset_all()?;
        db.set_schema_version(version)
    })
}

pub(crate) fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- One row per markdown file
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            path TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            modified_at TEXT NOT NULL,
            tags_json TEXT NOT NULL DEFAULT '[]',
            content TEXT NOT NULL
        );
        "#,
    )
}

pub(crate) fn drop_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS documents;
         DROP TABLE IF EXISTS schema_version;",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::sample_document;

    #[test]
    fn test_fresh_store_is_initialised() {
        let db = IndexDb::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), None);

        assert!(ensure_current_schema(&db, SCHEMA_VERSION).unwrap());
        assert_eq!(db.schema_version().unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_matching_version_is_noop() {
        let db = IndexDb::open_in_memory().unwrap();
        ensure_current_schema(&db, SCHEMA_VERSION).unwrap();
        db.put_document(&sample_document("kept.md", &["a"])).unwrap();

        assert!(!ensure_current_schema(&db, SCHEMA_VERSION).unwrap());
        assert_eq!(db.count_documents().unwrap(), 1);
    }

    #[test]
    fn test_version_change_discards_documents() {
        let db = IndexDb::open_in_memory().unwrap();
        ensure_current_schema(&db, 1).unwrap();
        db.put_document(&sample_document("old.md", &[])).unwrap();

        assert!(ensure_current_schema(&db, 2).unwrap());
        assert_eq!(db.count_documents().unwrap(), 0);
        assert_eq!(db.schema_version().unwrap(), Some(2));

        // Going back is a change too.
        db.put_document(&sample_document("newer.md", &[])).unwrap();
        assert!(ensure_current_schema(&db, 1).unwrap());
        assert_eq!(db.count_documents().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_version_record_resets() {
        let db = IndexDb::open_in_memory().unwrap();
        ensure_current_schema(&db, SCHEMA_VERSION).unwrap();
        db.put_document(&sample_document("doc.md", &[])).unwrap();
        db.connection()
            .execute("UPDATE schema_version SET version = 'garbage' WHERE id = 1", [])
            .unwrap();

        assert!(db.schema_version().unwrap_err().is_corrupt());
        assert!(ensure_current_schema(&db, SCHEMA_VERSION).unwrap());
        assert_eq!(db.schema_version().unwrap(), Some(SCHEMA_VERSION));
        assert_eq!(db.count_documents().unwrap(), 0);
    }

    #[test]
    fn test_foreign_version_table_resets() {
        let db = IndexDb::open_in_memory().unwrap();
        db.put_document(&sample_document("doc.md", &[])).unwrap();
        db.connection()
            .execute_batch(
                "DROP TABLE schema_version;
                 CREATE TABLE schema_version (version INTEGER);
                 INSERT INTO schema_version (version) VALUES (1);",
            )
            .unwrap();

        assert!(ensure_current_schema(&db, SCHEMA_VERSION).unwrap());
        assert_eq!(db.schema_version().unwrap(), Some(SCHEMA_VERSION));
        assert_eq!(db.count_documents().unwrap(), 0);
    }

    #[test]
    fn test_reset_recreates_tables_with_current_shape() {
        let db = IndexDb::open_in_memory().unwrap();
        db.connection()
            .execute_batch(
                "DROP TABLE documents;
                 CREATE TABLE documents (id INTEGER PRIMARY KEY, uri TEXT);",
            )
            .unwrap();

        ensure_current_schema(&db, SCHEMA_VERSION).unwrap();
        db.put_document(&sample_document("fresh.md", &["x"])).unwrap();
        assert_eq!(db.count_documents().unwrap(), 1);
    }
}

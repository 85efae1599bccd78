//! Database connection and operations.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use thiserror::Error;

use super::schema::{create_tables, drop_tables};
use super::types::{DocumentQuery, IndexedDocument, TagFilter};
use crate::config::ResolvedConfig;

/// File name of the durable index inside the data directory.
pub const INDEX_FILE_NAME: &str = "index.db";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index unavailable at {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Index data is corrupt: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Failed to encode tags: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IndexError {
    /// Persisted data exists but cannot be decoded (as opposed to being outdated).
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }

    fn unavailable(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable { path: path.display().to_string(), source: Box::new(source) }
    }
}

impl From<rusqlite::Error> for IndexError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(failure, _)
                if matches!(
                    failure.code,
                    ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase
                ) =>
            {
                Self::Corrupt(e.to_string())
            }
            rusqlite::Error::SqliteFailure(failure, Some(message))
                if failure.code == ErrorCode::Unknown && is_shape_mismatch(message) =>
            {
                Self::Corrupt(e.to_string())
            }
            rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..) => Self::Corrupt(e.to_string()),
            _ => Self::Database(e),
        }
    }
}

/// Generic SQLite errors that mean the stored tables or values do not have the
/// shape this build writes.
fn is_shape_mismatch(message: &str) -> bool {
    message.starts_with("no such column")
        || message.starts_with("no such table")
        || message.contains("malformed JSON")
}

/// Vault index database handle.
///
/// Every mutating call commits on return unless it runs inside
/// [`IndexDb::transaction`].
pub struct IndexDb {
    conn: Connection,
}

impl IndexDb {
    /// Open or create an index database at the given path.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let conn = Connection::open(path).map_err(|e| IndexError::unavailable(path, e))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .and_then(|()| create_tables(&conn))
        .map_err(|e| IndexError::unavailable(path, e))?;
        Ok(Self { conn })
    }

    /// Open the index inside `data_dir`, creating the directory if needed.
    pub fn open_data_dir(data_dir: &Path) -> Result<Self, IndexError> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| IndexError::unavailable(data_dir, e))?;
        Self::open(&data_dir.join(INDEX_FILE_NAME))
    }

    /// Create an in-memory database that lives as long as this handle.
    pub fn open_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| IndexError::unavailable(Path::new(":memory:"), e))?;
        create_tables(&conn).map_err(|e| IndexError::unavailable(Path::new(":memory:"), e))?;
        Ok(Self { conn })
    }

    /// Open the store in the mode the configuration selects.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, IndexError> {
        if config.in_memory {
            Self::open_in_memory()
        } else {
            Self::open_data_dir(&config.data_dir)
        }
    }

    /// Get the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a single transaction; it is rolled back if `f` fails.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<IndexError>,
    {
        let tx = self.conn.unchecked_transaction().map_err(IndexError::from)?;
        let value = f(self)?;
        tx.commit().map_err(IndexError::from)?;
        Ok(value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Schema version
    // ─────────────────────────────────────────────────────────────────────────

    /// Recorded schema version, `None` for a fresh store.
    pub fn schema_version(&self) -> Result<Option<i32>, IndexError> {
        let value: Option<Value> = self
            .conn
            .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match value {
            None => Ok(None),
            Some(Value::Integer(v)) => i32::try_from(v)
                .map(Some)
                .map_err(|_| IndexError::Corrupt(format!("schema version {v} out of range"))),
            Some(other) => {
                Err(IndexError::Corrupt(format!("schema version is not an integer: {other:?}")))
            }
        }
    }

    pub fn set_schema_version(&self, version: i32) -> Result<(), IndexError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?1)",
            [version],
        )?;
        Ok(())
    }

    /// Drop every document and the schema version record.
    pub fn reset_all(&self) -> Result<(), IndexError> {
        drop_tables(&self.conn)?;
        create_tables(&self.conn)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Documents CRUD
    // ─────────────────────────────────────────────────────────────────────────

    /// Upsert a document by path, returning its ID.
    pub fn put_document(&self, doc: &IndexedDocument) -> Result<i64, IndexError> {
        let tags_json = serde_json::to_string(&doc.tags)?;

        let id: i64 = self.conn.query_row(
            "INSERT INTO documents (path, title, modified_at, tags_json, content)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(path) DO UPDATE SET
                title = excluded.title,
                modified_at = excluded.modified_at,
                tags_json = excluded.tags_json,
                content = excluded.content
             RETURNING id",
            params![
                doc.path.to_string_lossy(),
                doc.title,
                format_timestamp(&doc.modified),
                tags_json,
                doc.content,
            ],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    /// Get a document by its path.
    pub fn get_document(&self, path: &Path) -> Result<Option<IndexedDocument>, IndexError> {
        self.conn
            .query_row(
                "SELECT id, path, title, modified_at, tags_json, content
                 FROM documents WHERE path = ?1",
                [path.to_string_lossy()],
                DocumentRow::from_row,
            )
            .optional()?
            .map(DocumentRow::decode)
            .transpose()
    }

    /// Stored modification time for a path (for change detection).
    ///
    /// The record's tags are decoded too, so a row that could not be read back
    /// in full is reported as [`IndexError::Corrupt`] here rather than later
    /// during a search.
    pub fn get_modified(&self, path: &Path) -> Result<Option<DateTime<Utc>>, IndexError> {
        let stored: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT modified_at, tags_json FROM documents WHERE path = ?1",
                [path.to_string_lossy()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        stored
            .map(|(modified_at, tags_json)| {
                decode_tags(&path.to_string_lossy(), &tags_json)?;
                parse_timestamp(&modified_at)
            })
            .transpose()
    }

    /// Delete a document by path. Returns whether a record was removed.
    pub fn delete_document(&self, path: &Path) -> Result<bool, IndexError> {
        let rows = self
            .conn
            .execute("DELETE FROM documents WHERE path = ?1", [path.to_string_lossy()])?;
        Ok(rows > 0)
    }

    /// Every indexed path, in path order.
    pub fn list_all_paths(&self) -> Result<Vec<PathBuf>, IndexError> {
        let mut stmt = self.conn.prepare("SELECT path FROM documents ORDER BY path")?;
        let paths = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|r| r.map(PathBuf::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paths)
    }

    /// Query documents with filters, ordered by path.
    pub fn query_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<IndexedDocument>, IndexError> {
        let mut sql = String::from(
            "SELECT id, path, title, modified_at, tags_json, content
             FROM documents WHERE 1=1",
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        match &query.tags {
            Some(TagFilter::All(tags)) => {
                for tag in tags {
                    sql.push_str(
                        " AND EXISTS (SELECT 1 FROM json_each(documents.tags_json)
                                      WHERE json_each.value = ?)",
                    );
                    params_vec.push(Box::new(tag.clone()));
                }
            }
            Some(TagFilter::Any(tags)) => {
                if tags.is_empty() {
                    return Ok(Vec::new());
                }
                let placeholders = vec!["?"; tags.len()].join(", ");
                sql.push_str(&format!(
                    " AND EXISTS (SELECT 1 FROM json_each(documents.tags_json)
                                  WHERE json_each.value IN ({placeholders}))"
                ));
                for tag in tags {
                    params_vec.push(Box::new(tag.clone()));
                }
            }
            None => {}
        }

        if let Some(prefix) = &query.path_prefix {
            sql.push_str(" AND path LIKE ? ESCAPE '\\'");
            params_vec.push(Box::new(format!("{}%", escape_like(prefix))));
        }

        sql.push_str(" ORDER BY path");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_refs.as_slice(), DocumentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(DocumentRow::decode).collect()
    }

    /// Every document, ordered by path.
    pub fn all_documents(&self) -> Result<Vec<IndexedDocument>, IndexError> {
        self.query_documents(&DocumentQuery::default())
    }

    /// Get total document count.
    pub fn count_documents(&self) -> Result<i64, IndexError> {
        let count: i64 =
            self.conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Raw column values, decoded separately so malformed data surfaces as
/// [`IndexError::Corrupt`].
struct DocumentRow {
    id: i64,
    path: String,
    title: String,
    modified_at: String,
    tags_json: String,
    content: String,
}

impl DocumentRow {
    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            path: row.get(1)?,
            title: row.get(2)?,
            modified_at: row.get(3)?,
            tags_json: row.get(4)?,
            content: row.get(5)?,
        })
    }

    fn decode(self) -> Result<IndexedDocument, IndexError> {
        let tags = decode_tags(&self.path, &self.tags_json)?;

        Ok(IndexedDocument {
            id: Some(self.id),
            modified: parse_timestamp(&self.modified_at)?,
            path: self.path.into(),
            title: self.title,
            tags,
            content: self.content,
        })
    }
}

fn decode_tags(path: &str, tags_json: &str) -> Result<BTreeSet<String>, IndexError> {
    serde_json::from_str(tags_json)
        .map_err(|e| IndexError::Corrupt(format!("invalid tags for {path}: {e}")))
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, IndexError> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| IndexError::Corrupt(format!("invalid timestamp {s:?}: {e}")))
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

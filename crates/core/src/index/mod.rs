//! Incremental vault index.
//!
//! This module provides SQLite-based indexing for:
//! - Document records (path, title, modification time, tags, content)
//! - Change detection against the filesystem by modification time
//! - Text and tag search over the indexed documents
//!
//! # Example
//!
//! ```no_run
//! use mdindex_core::index::{IndexBuilder, IndexDb, SearchEngine, SearchQuery, TagFilter};
//! use std::path::Path;
//!
//! let db = IndexDb::open_data_dir(Path::new("vault/.mdindex")).unwrap();
//! IndexBuilder::new(&db, Path::new("vault")).reindex(None).unwrap();
//!
//! let query = SearchQuery::default().with_tags(TagFilter::Any(vec!["urgent".into()]));
//! let urgent = SearchEngine::new(&db).search(&query).unwrap();
//! ```

pub mod builder;
pub mod changes;
pub mod db;
pub mod schema;
pub mod search;
pub mod types;

pub use builder::{BuilderError, IndexBuilder, IndexStats, ProgressCallback, SkippedFile};
pub use changes::{ChangeDetector, ChangeSet};
pub use db::{INDEX_FILE_NAME, IndexDb, IndexError};
pub use schema::{SCHEMA_VERSION, SchemaError, ensure_current_schema, reset_schema};
pub use search::{SearchEngine, SearchQuery};
pub use types::{DocumentQuery, IndexedDocument, TagFilter};

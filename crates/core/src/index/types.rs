//! Index data types for vault documents.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A markdown document in the vault index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Database ID (None if not yet inserted).
    pub id: Option<i64>,
    /// Path relative to vault root.
    pub path: PathBuf,
    /// Frontmatter title or file stem.
    pub title: String,
    /// File modification time observed when the document was indexed.
    pub modified: DateTime<Utc>,
    /// Tags from frontmatter and inline markers.
    pub tags: BTreeSet<String>,
    /// Raw file content.
    pub content: String,
}

impl IndexedDocument {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Tag relation a document must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilter {
    /// Every listed tag must be present. An empty list matches everything.
    All(Vec<String>),
    /// At least one listed tag must be present. An empty list matches nothing.
    Any(Vec<String>),
}

impl TagFilter {
    pub fn tags(&self) -> &[String] {
        match self {
            Self::All(tags) | Self::Any(tags) => tags,
        }
    }
}

/// Query parameters for listing documents from the store.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    /// Filter by tag relation.
    pub tags: Option<TagFilter>,
    /// Filter by path prefix.
    pub path_prefix: Option<String>,
}

//! Text and tag search over indexed documents.
//!
//! Matching is exact: a case-insensitive substring test on the content and a
//! set relation on tags. There is no relevance scoring; results come back in
//! path order, which is stable for a given store snapshot.

use super::IndexError;
use super::db::IndexDb;
use super::types::{DocumentQuery, IndexedDocument, TagFilter};

/// Search query parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Substring to look for in the content, ignoring case.
    pub text: Option<String>,
    /// Required tag relation.
    pub tags: Option<TagFilter>,
    /// Path prefix filter.
    pub path_prefix: Option<String>,
    /// Maximum results to return.
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Default::default() }
    }

    pub fn with_tags(mut self, filter: TagFilter) -> Self {
        self.tags = Some(filter);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Search engine using the vault index.
pub struct SearchEngine<'a> {
    db: &'a IndexDb,
}

impl<'a> SearchEngine<'a> {
    /// Create a new search engine.
    pub fn new(db: &'a IndexDb) -> Self {
        Self { db }
    }

    /// Documents matching every filter present in `query`, ordered by path.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<IndexedDocument>, IndexError> {
        let candidates = self.db.query_documents(&DocumentQuery {
            tags: query.tags.clone(),
            path_prefix: query.path_prefix.clone(),
        })?;

        let needle = query.text.as_deref().map(str::to_lowercase).filter(|t| !t.is_empty());
        let matches = candidates.into_iter().filter(|doc| match &needle {
            Some(needle) => doc.content.to_lowercase().contains(needle.as_str()),
            None => true,
        });

        Ok(match query.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        })
    }
}

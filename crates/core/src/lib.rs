//! Incremental indexing and search for markdown vaults.
//!
//! The filesystem is the source of truth. The index is a derived cache that
//! is kept in sync by [`index::IndexBuilder::reindex`] and can always be
//! rebuilt from scratch.

pub mod config;
pub mod frontmatter;
pub mod index;
pub mod vault;

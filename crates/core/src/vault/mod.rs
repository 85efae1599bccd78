//! Vault file discovery and content extraction.
//!
//! This module provides utilities for walking vault directories and
//! extracting the title and tags of markdown files.

pub mod extractor;
pub mod tags;
pub mod walker;

pub use extractor::{ExtractedDocument, extract_document};
pub use tags::{extract_tags, frontmatter_tags, inline_tags};
pub use walker::{VaultScan, VaultWalker, VaultWalkerError, WalkedFile};

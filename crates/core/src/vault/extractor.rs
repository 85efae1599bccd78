//! Document metadata extraction: title and tags.

use std::collections::BTreeSet;
use std::path::Path;

use super::tags::{collect_tags, split_document};
use crate::frontmatter::Frontmatter;

/// Derived information from a markdown file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Frontmatter `title`, else the file name without extension.
    pub title: String,
    /// Same set [`super::extract_tags`] returns for this content.
    pub tags: BTreeSet<String>,
}

/// Extract document metadata, parsing the frontmatter once.
pub fn extract_document(content: &str, file_path: &Path) -> ExtractedDocument {
    let (frontmatter, body) = split_document(content);

    ExtractedDocument {
        title: extract_title(frontmatter.as_ref(), file_path),
        tags: collect_tags(frontmatter.as_ref(), body),
    }
}

fn extract_title(fm: Option<&Frontmatter>, file_path: &Path) -> String {
    if let Some(title) = fm.and_then(Frontmatter::title)
        && !title.trim().is_empty()
    {
        return title.trim().to_string();
    }

    file_path.file_stem().and_then(|s| s.to_str()).unwrap_or("Untitled").to_string()
}

//! Shared output formatting for index commands.

use mdindex_core::index::{IndexStats, IndexedDocument};
use serde::Serialize;

use crate::OutputFormat;

/// Formatted document for JSON output.
#[derive(Debug, Serialize)]
pub struct DocumentOutput {
    pub path: String,
    pub title: String,
    pub modified: String,
    pub tags: Vec<String>,
}

impl From<&IndexedDocument> for DocumentOutput {
    fn from(doc: &IndexedDocument) -> Self {
        Self {
            path: doc.path.to_string_lossy().to_string(),
            title: doc.title.clone(),
            modified: doc.modified.to_rfc3339(),
            tags: doc.tags.iter().cloned().collect(),
        }
    }
}

/// Print documents in the requested format.
pub fn print_documents(docs: &[IndexedDocument], format: OutputFormat) {
    match format {
        OutputFormat::Table => print_documents_table(docs),
        OutputFormat::Json => print_documents_json(docs),
        OutputFormat::Quiet => print_documents_quiet(docs),
    }
}

/// Print documents as a table.
pub fn print_documents_table(docs: &[IndexedDocument]) {
    if docs.is_empty() {
        println!("(no documents found)");
        return;
    }

    // Calculate column widths
    let path_width = docs
        .iter()
        .map(|d| d.path.to_string_lossy().chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 50);
    let title_width =
        docs.iter().map(|d| d.title.chars().count()).max().unwrap_or(5).clamp(5, 30);

    // Header
    println!(
        "{:<path_width$}  {:<title_width$}  {:<16}  TAGS",
        "PATH",
        "TITLE",
        "MODIFIED",
        path_width = path_width,
        title_width = title_width,
    );
    println!(
        "{:-<path_width$}  {:-<title_width$}  {:-<16}  {:-<4}",
        "",
        "",
        "",
        "",
        path_width = path_width,
        title_width = title_width,
    );

    // Rows
    for doc in docs {
        let path = truncate(&doc.path.to_string_lossy(), path_width);
        let title = truncate(&doc.title, title_width);
        let modified = doc.modified.format("%Y-%m-%d %H:%M").to_string();
        let tags = doc.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" ");

        println!(
            "{:<path_width$}  {:<title_width$}  {:<16}  {}",
            path,
            title,
            modified,
            tags,
            path_width = path_width,
            title_width = title_width,
        );
    }

    println!();
    println!("-- {} documents --", docs.len());
}

/// Print documents as JSON.
pub fn print_documents_json(docs: &[IndexedDocument]) {
    let output: Vec<DocumentOutput> = docs.iter().map(DocumentOutput::from).collect();
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}

/// Print documents as paths only (quiet mode).
pub fn print_documents_quiet(docs: &[IndexedDocument]) {
    for doc in docs {
        println!("{}", doc.path.display());
    }
}

/// Print pass statistics, human-readable.
pub fn print_stats(stats: &IndexStats) {
    println!("  Files found:    {}", stats.files_found);
    println!("  Added:          {}", stats.added);
    println!("  Updated:        {}", stats.updated);
    println!("  Deleted:        {}", stats.deleted);
    println!("  Unchanged:      {}", stats.unchanged);
    if stats.schema_reset {
        println!("  Index rebuilt:  yes");
    }
    if !stats.skipped.is_empty() {
        println!("  Skipped:        {}", stats.skipped.len());
        for skipped in &stats.skipped {
            println!("    {}: {}", skipped.path.display(), skipped.reason);
        }
    }
    println!("  Duration:       {}ms", stats.duration_ms);
}

/// Truncate string with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    } else {
        s.chars().take(max_len).collect()
    }
}

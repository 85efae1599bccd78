//! Index building orchestration.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::changes::{ChangeDetector, ChangeSet};
use super::db::{IndexDb, IndexError};
use super::schema::{SCHEMA_VERSION, SchemaError, ensure_current_schema, reset_schema};
use super::types::IndexedDocument;
use crate::vault::{VaultWalker, VaultWalkerError, WalkedFile, extract_document};

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Vault walker error: {0}")]
    Walker(#[from] VaultWalkerError),

    #[error("Index database error: {0}")]
    Index(#[from] IndexError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// A file left out of a pass because it could not be read or named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    #[serde(serialize_with = "serialize_lossy")]
    pub path: PathBuf,
    pub reason: String,
}

fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Statistics from an indexing operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStats {
    /// Number of markdown files discovered.
    pub files_found: usize,
    /// Documents created for files not previously indexed.
    pub added: usize,
    /// Documents overwritten because their file is newer.
    pub updated: usize,
    /// Files left untouched.
    pub unchanged: usize,
    /// Documents removed because their file is gone.
    pub deleted: usize,
    /// Files whose content was read.
    pub documents_read: usize,
    /// Puts plus deletes applied to the store.
    pub documents_written: usize,
    /// Whether the store was wiped before this pass.
    pub schema_reset: bool,
    /// Files that could not be read; retried next pass.
    pub skipped: Vec<SkippedFile>,
    /// Indexing duration in milliseconds.
    pub duration_ms: u64,
}

impl IndexStats {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Progress callback for indexing operations.
/// Parameters: (current, total, current_path)
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str)>;

/// Builder for keeping the vault index in sync with the filesystem.
pub struct IndexBuilder<'a> {
    db: &'a IndexDb,
    vault_root: &'a Path,
    excluded_folders: Vec<PathBuf>,
    schema_version: i32,
}

impl<'a> IndexBuilder<'a> {
    /// Create a new index builder.
    pub fn new(db: &'a IndexDb, vault_root: &'a Path) -> Self {
        Self { db, vault_root, excluded_folders: Vec::new(), schema_version: SCHEMA_VERSION }
    }

    /// Skip these folders (vault-relative or absolute) when walking.
    pub fn with_exclusions(mut self, excluded_folders: Vec<PathBuf>) -> Self {
        self.excluded_folders = excluded_folders;
        self
    }

    /// Compare against a schema version other than the compiled-in one.
    pub fn with_schema_version(mut self, version: i32) -> Self {
        self.schema_version = version;
        self
    }

    /// Run one incremental pass: schema check, diff, then apply.
    ///
    /// Only new and modified files are read. Unreadable files are reported in
    /// [`IndexStats::skipped`] and do not abort the pass.
    pub fn reindex(&self, progress: Option<ProgressCallback>) -> Result<IndexStats, BuilderError> {
        let start = std::time::Instant::now();
        let mut stats = IndexStats {
            schema_reset: ensure_current_schema(self.db, self.schema_version)?,
            ..Default::default()
        };

        let walker = VaultWalker::with_exclusions(self.vault_root, self.excluded_folders.clone())?;
        let scan = walker.scan()?;
        for path in scan.unsupported {
            tracing::warn!("Skipping {}: file name is not valid UTF-8", path.display());
            stats.skipped.push(SkippedFile { path, reason: "file name is not valid UTF-8".into() });
        }

        let mut changes = self.diff(scan.files, &mut stats)?;
        if changes.is_empty() {
            tracing::debug!("No changes under {}", walker.root().display());
        }

        // Reads and extraction are independent per file.
        let mut results: Vec<(bool, PathBuf, io::Result<IndexedDocument>)> = changes
            .new
            .par_iter()
            .map(|f| (true, f))
            .chain(changes.modified.par_iter().map(|f| (false, f)))
            .map(|(is_new, file)| (is_new, file.relative_path.clone(), read_document(file)))
            .collect();
        results.sort_by(|a, b| a.1.cmp(&b.1));

        let mut documents = Vec::with_capacity(results.len());
        for (is_new, path, result) in results {
            match result {
                Ok(doc) => {
                    if is_new {
                        stats.added += 1;
                    } else {
                        stats.updated += 1;
                    }
                    documents.push(doc);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("{} vanished during indexing", path.display());
                    changes.mark_vanished(&path);
                }
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                    stats.skipped.push(SkippedFile { path, reason: e.to_string() });
                }
            }
        }

        stats.files_found = changes.files_found();
        stats.unchanged = changes.unchanged.len();
        stats.documents_read = documents.len();

        let total = documents.len() + changes.deleted.len();
        self.db.transaction(|db| {
            for (i, doc) in documents.iter().enumerate() {
                if let Some(ref cb) = progress {
                    cb(i + 1, total, &doc.path.to_string_lossy());
                }
                db.put_document(doc)?;
                stats.documents_written += 1;
            }

            for (i, path) in changes.deleted.iter().enumerate() {
                if let Some(ref cb) = progress {
                    cb(documents.len() + i + 1, total, &path.to_string_lossy());
                }
                if db.delete_document(path)? {
                    stats.deleted += 1;
                    stats.documents_written += 1;
                }
            }

            Ok::<_, BuilderError>(())
        })?;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexed {}: {} found, {} added, {} updated, {} deleted, {} unchanged, {} skipped in {}ms",
            walker.root().display(),
            stats.files_found,
            stats.added,
            stats.updated,
            stats.deleted,
            stats.unchanged,
            stats.skipped.len(),
            stats.duration_ms
        );

        Ok(stats)
    }

    /// Classify the snapshot, rebuilding the store once if it cannot be decoded.
    fn diff(
        &self,
        files: Vec<WalkedFile>,
        stats: &mut IndexStats,
    ) -> Result<ChangeSet, BuilderError> {
        let detector = ChangeDetector::new(self.db);
        match detector.classify(files.clone()) {
            Ok(changes) => Ok(changes),
            Err(e) if e.is_corrupt() => {
                tracing::warn!("Index data is unreadable, rebuilding: {}", e);
                reset_schema(self.db, self.schema_version)?;
                stats.schema_reset = true;
                Ok(detector.classify(files)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn read_document(file: &WalkedFile) -> io::Result<IndexedDocument> {
    let content = std::fs::read_to_string(&file.absolute_path)?;
    let extracted = extract_document(&content, &file.relative_path);

    Ok(IndexedDocument {
        id: None,
        path: file.relative_path.clone(),
        title: extracted.title,
        modified: file.modified,
        tags: extracted.tags,
        content,
    })
}

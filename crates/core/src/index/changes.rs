//! Classification of vault files against the index by modification time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::builder::BuilderError;
use super::db::{IndexDb, IndexError};
use crate::vault::{VaultWalker, WalkedFile};

/// Result of comparing the files on disk with the indexed documents.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// On disk, not in the index.
    pub new: Vec<WalkedFile>,
    /// On disk with an mtime strictly newer than the indexed one.
    pub modified: Vec<WalkedFile>,
    /// Indexed and not newer on disk.
    pub unchanged: Vec<PathBuf>,
    /// Indexed but absent from the disk snapshot.
    pub deleted: Vec<PathBuf>,
}

impl ChangeSet {
    /// Nothing to write.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Number of markdown files seen on disk.
    pub fn files_found(&self) -> usize {
        self.new.len() + self.modified.len() + self.unchanged.len()
    }

    /// A file that vanished after enumeration becomes a deletion for this pass.
    ///
    /// Only a previously indexed file (one classified `modified`) has a
    /// document to delete; a vanished `new` file is simply dropped.
    pub fn mark_vanished(&mut self, path: &Path) {
        self.new.retain(|f| f.relative_path != path);

        let before = self.modified.len();
        self.modified.retain(|f| f.relative_path != path);
        if self.modified.len() != before {
            self.deleted.push(path.to_path_buf());
            self.deleted.sort();
        }
    }
}

/// Compares a vault walk against the index.
pub struct ChangeDetector<'a> {
    db: &'a IndexDb,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(db: &'a IndexDb) -> Self {
        Self { db }
    }

    /// Walk the vault once and classify every file.
    pub fn diff(&self, walker: &VaultWalker) -> Result<ChangeSet, BuilderError> {
        let files = walker.walk()?;
        Ok(self.classify(files)?)
    }

    /// Classify an already-taken disk snapshot.
    ///
    /// Deletions are computed from this snapshot, never from a fresh look at
    /// the filesystem.
    pub fn classify(&self, files: Vec<WalkedFile>) -> Result<ChangeSet, IndexError> {
        let mut changes = ChangeSet::default();
        let on_disk: HashSet<PathBuf> = files.iter().map(|f| f.relative_path.clone()).collect();

        for file in files {
            match self.db.get_modified(&file.relative_path)? {
                None => {
                    tracing::debug!("new: {}", file.relative_path.display());
                    changes.new.push(file);
                }
                Some(stored) if file.modified > stored => {
                    tracing::debug!("modified: {}", file.relative_path.display());
                    changes.modified.push(file);
                }
                Some(_) => changes.unchanged.push(file.relative_path),
            }
        }

        changes.deleted = self
            .db
            .list_all_paths()?
            .into_iter()
            .filter(|p| !on_disk.contains(p))
            .inspect(|p| tracing::debug!("deleted: {}", p.display()))
            .collect();

        Ok(changes)
    }
}

//! Recursive vault directory walker.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use walkdir::WalkDir;

/// File extension that marks a vault document.
pub const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("failed to read file metadata {0}: {1}")]
    MetadataError(String, #[source] io::Error),
}

/// A markdown file found on disk, with the modification time observed while walking.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Absolute path to the file.
    pub absolute_path: PathBuf,
    /// Path relative to vault root; the document's identity in the index.
    pub relative_path: PathBuf,
    /// File modification time.
    pub modified: DateTime<Utc>,
}

/// Everything one walk turned up.
#[derive(Debug, Default)]
pub struct VaultScan {
    /// Indexable files, sorted by relative path.
    pub files: Vec<WalkedFile>,
    /// Markdown files whose vault-relative path is not valid UTF-8 and so
    /// cannot serve as a document path.
    pub unsupported: Vec<PathBuf>,
}

/// Walker for discovering markdown files in a vault.
#[derive(Debug)]
pub struct VaultWalker {
    root: PathBuf,
    /// Folders to exclude from walking (relative paths from vault root).
    excluded_folders: Vec<PathBuf>,
}

impl VaultWalker {
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Create a new walker with folder exclusions.
    ///
    /// Exclusions may be relative to the vault root or absolute paths inside it.
    pub fn with_exclusions(
        root: &Path,
        excluded_folders: Vec<PathBuf>,
    ) -> Result<Self, VaultWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultWalkerError::MissingRoot(root.display().to_string()))?;

        if !root.is_dir() {
            return Err(VaultWalkerError::MissingRoot(root.display().to_string()));
        }

        let excluded_folders = excluded_folders
            .into_iter()
            .map(|p| {
                if p.is_absolute() {
                    // Canonicalize so symlinked roots (e.g. /tmp on macOS) still match.
                    let p = p.canonicalize().unwrap_or(p);
                    p.strip_prefix(&root).map(Path::to_path_buf).unwrap_or(p)
                } else {
                    p
                }
            })
            .collect();

        Ok(Self { root, excluded_folders })
    }

    /// Walk the vault and return all indexable markdown files, sorted by
    /// relative path.
    pub fn walk(&self) -> Result<Vec<WalkedFile>, VaultWalkerError> {
        Ok(self.scan()?.files)
    }

    /// Walk the vault, also reporting markdown files that cannot be indexed.
    ///
    /// A file that disappears between listing and `stat` is left out, which the
    /// change detector then sees as a deletion.
    pub fn scan(&self) -> Result<VaultScan, VaultWalkerError> {
        let mut scan = VaultScan::default();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = entry.map_err(|e| {
                VaultWalkerError::WalkError(self.root.display().to_string(), e)
            })?;

            let path = entry.path();
            if !is_markdown_file(path) {
                continue;
            }

            let metadata = match path.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "file vanished while walking");
                    continue;
                }
                Err(e) => {
                    return Err(VaultWalkerError::MetadataError(
                        path.display().to_string(),
                        e,
                    ));
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let modified = metadata.modified().map_err(|e| {
                VaultWalkerError::MetadataError(path.display().to_string(), e)
            })?;

            let relative_path =
                path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

            if relative_path.to_str().is_none() {
                scan.unsupported.push(relative_path);
                continue;
            }

            scan.files.push(WalkedFile {
                absolute_path: path.to_path_buf(),
                relative_path,
                modified: modified.into(),
            });
        }

        scan.files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        scan.unsupported.sort();
        Ok(scan)
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();

        if name.starts_with('.') {
            return true;
        }

        if entry.file_type().is_dir()
            && matches!(name.as_ref(), "node_modules" | "target" | "__pycache__" | "venv")
        {
            return true;
        }

        if let Ok(relative) = entry.path().strip_prefix(&self.root) {
            return self.excluded_folders.iter().any(|excluded| relative.starts_with(excluded));
        }

        false
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::loader::default_data_dir;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Directory holding the durable index (defaults to `{{vault_root}}/.mdindex`).
    pub data_dir: Option<String>,
    /// Keep the index in memory only; every run starts from an empty index.
    #[serde(default)]
    pub in_memory: bool,
    /// Folders to exclude from indexing (relative to vault_root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    pub data_dir: PathBuf,
    pub in_memory: bool,
    /// Folders to exclude from indexing (resolved to absolute paths).
    pub excluded_folders: Vec<PathBuf>,
    pub logging: LoggingConfig,
}

impl ResolvedConfig {
    /// Configuration for a vault given directly, without a config file.
    pub fn for_vault(vault_root: impl Into<PathBuf>) -> Self {
        let vault_root = vault_root.into();
        Self {
            active_profile: "default".to_string(),
            data_dir: default_data_dir(&vault_root),
            vault_root,
            in_memory: false,
            excluded_folders: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }

    /// Point this configuration at another vault.
    ///
    /// Exclusions inside the old vault move with it, as does a defaulted data
    /// directory. Exclusions and data directories outside the old vault stay put.
    pub fn with_vault_root(mut self, vault_root: impl Into<PathBuf>) -> Self {
        let vault_root = vault_root.into();
        if self.data_dir == default_data_dir(&self.vault_root) {
            self.data_dir = default_data_dir(&vault_root);
        }
        self.excluded_folders = self
            .excluded_folders
            .into_iter()
            .map(|folder| match folder.strip_prefix(&self.vault_root) {
                Ok(relative) => vault_root.join(relative),
                Err(_) => folder,
            })
            .collect();
        self.vault_root = vault_root;
        self
    }

    /// Folders the walker must skip: the configured exclusions plus the data
    /// directory when it lives inside the vault.
    pub fn walker_exclusions(&self) -> Vec<PathBuf> {
        let mut excluded = self.excluded_folders.clone();
        if is_within(&self.data_dir, &self.vault_root) && !excluded.contains(&self.data_dir)
        {
            excluded.push(self.data_dir.clone());
        }
        excluded
    }
}

fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root) && path != root
}

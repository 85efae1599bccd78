//! Profile-based configuration loaded from TOML.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path, default_data_dir};
pub use types::{LoggingConfig, ResolvedConfig};

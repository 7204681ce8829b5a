//! Configuration management for Rigger
//!
//! Two layers: per-project `rigger.toml` files (see [`project`]) that the
//! resolver loads recursively, and user settings (see [`schema`]) that tune
//! hashing, fan-out and where remote sources are checked out.

pub mod loader;
pub mod project;
pub mod schema;

pub use loader::{ConfigLoader, FileConfigLoader, LoadOptions, CONFIG_FILE};
pub use project::{
    BuildConfig, Config, DependencyConfig, DeployConfig, ProfileConfig, SourceConfig,
};
pub use schema::Settings;

use crate::error::{RiggerError, RiggerResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// User settings manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default settings file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rigger")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rigger")
    }

    /// Get the default checkout directory for remote dependencies
    pub fn checkouts_dir() -> PathBuf {
        Self::state_dir().join("dependencies")
    }

    /// Load settings, using defaults if the file does not exist
    pub async fn load(&self) -> RiggerResult<Settings> {
        if !self.config_path.exists() {
            debug!("Settings file not found, using defaults");
            return Ok(Settings::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load settings from a specific file
    pub async fn load_from_file(&self, path: &Path) -> RiggerResult<Settings> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| RiggerError::io(format!("reading settings from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| RiggerError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Build the dependency load options described by the settings
    pub fn load_options(settings: &Settings) -> LoadOptions {
        let checkout_dir = settings
            .sources
            .checkout_dir
            .clone()
            .unwrap_or_else(Self::checkouts_dir);

        LoadOptions {
            config_file: settings.general.config_file.clone(),
            ..LoadOptions::new(checkout_dir)
        }
        .with_excludes(&settings.hash.excludes)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

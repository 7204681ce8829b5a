//! Loading project configurations
//!
//! The resolver loads every dependency's configuration through the
//! [`ConfigLoader`] trait so tests and alternative layouts can substitute
//! their own loader.

use crate::config::project::Config;
use crate::error::{RiggerError, RiggerResult};
use crate::hash::with_default_excludes;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Default project configuration file name
pub const CONFIG_FILE: &str = "rigger.toml";

/// Loads a project's configuration with a profile applied
///
/// Implementations must be deterministic: the same directory and profile
/// always produce the same configuration.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// Load the configuration of the project in `project_dir`
    async fn load(&self, project_dir: &Path, profile: Option<&str>) -> RiggerResult<Config>;
}

/// Reads `rigger.toml` (or a custom file name) from the project directory
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    file_name: String,
}

impl FileConfigLoader {
    /// Create a loader for the default file name
    pub fn new() -> Self {
        Self::with_file_name(CONFIG_FILE)
    }

    /// Create a loader for a custom file name
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Path of the configuration file of a project
    pub fn config_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.file_name)
    }
}

impl Default for FileConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load(&self, project_dir: &Path, profile: Option<&str>) -> RiggerResult<Config> {
        let path = self.config_path(project_dir);

        if !path.exists() {
            return Err(RiggerError::ConfigNotFound(path));
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| RiggerError::io(format!("reading config from {}", path.display()), e))?;

        debug!("Loaded {} (profile {:?})", path.display(), profile);
        Config::parse(&content, &path)?.activate(profile, &path)
    }
}

/// Options that shape how dependencies are loaded and fingerprinted
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Configuration file name inside each project
    pub config_file: String,

    /// Exclusion globs for content hashing (always includes `.git` and `.rigger`)
    pub excludes: Vec<String>,

    /// Where remote dependencies are checked out
    pub checkout_dir: PathBuf,
}

impl LoadOptions {
    /// Options with the given checkout directory and default everything else
    pub fn new(checkout_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_file: CONFIG_FILE.to_string(),
            excludes: with_default_excludes(&[]),
            checkout_dir: checkout_dir.into(),
        }
    }

    /// Add exclusion globs on top of the defaults
    pub fn with_excludes(mut self, extra: &[String]) -> Self {
        self.excludes = with_default_excludes(extra);
        self
    }
}

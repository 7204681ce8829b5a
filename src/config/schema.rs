//! User settings schema for Rigger
//!
//! Settings are stored at `~/.config/rigger/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// General settings
    pub general: GeneralSettings,

    /// Content hashing settings
    pub hash: HashSettings,

    /// Build/deploy fan-out settings
    pub orchestration: OrchestrationSettings,

    /// Remote source settings
    pub sources: SourceSettings,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Project configuration file name
    pub config_file: String,

    /// Tolerate cyclic dependencies by default
    pub allow_cyclic: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            config_file: crate::config::loader::CONFIG_FILE.to_string(),
            allow_cyclic: false,
        }
    }
}

/// Content hashing settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HashSettings {
    /// Extra exclusion globs (`.git` and `.rigger` are always excluded)
    pub excludes: Vec<String>,
}

/// Build/deploy fan-out settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationSettings {
    /// Maximum dependencies built or deployed at once
    pub concurrency: usize,

    /// Keep going after a dependency fails
    pub continue_on_error: bool,
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self {
            concurrency: 1,
            continue_on_error: false,
        }
    }
}

/// Remote source settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Where git dependencies are checked out (defaults to the state dir)
    pub checkout_dir: Option<PathBuf>,
}

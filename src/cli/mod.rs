//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::config::{ConfigLoader, ConfigManager, Settings};
use crate::error::{RiggerError, RiggerResult};
use crate::orchestration::{Collaborators, Manager};
use crate::state::StateStore;
use std::path::PathBuf;
use tracing::debug;

/// Everything a command needs to operate on the selected project
pub struct ProjectContext {
    pub manager: Manager,
    pub settings: Settings,
}

impl ProjectContext {
    /// Load settings and the project's configuration and state
    pub async fn open(cli: &Cli) -> RiggerResult<Self> {
        let config_manager = match cli.config {
            Some(ref path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        };
        let settings = config_manager.load().await?;

        let project_dir = match cli.project {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| RiggerError::io("getting current directory", e))?,
        };
        let project_dir: PathBuf = tokio::fs::canonicalize(&project_dir)
            .await
            .map_err(|_| RiggerError::PathNotFound(project_dir.clone()))?;
        debug!("Project directory: {}", project_dir.display());

        let options = ConfigManager::load_options(&settings);
        let collaborators = Collaborators::defaults(&options);

        let config = collaborators
            .loader
            .load(&project_dir, cli.profile.as_deref())
            .await?;
        let mut cached = collaborators.store.load(&project_dir).await?;
        cached.active_profile = cli.profile.clone();

        let manager = Manager::new(
            project_dir,
            config,
            cached,
            None,
            cli.allow_cyclic || settings.general.allow_cyclic,
            options,
            collaborators,
        );

        Ok(Self { manager, settings })
    }
}

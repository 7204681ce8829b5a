//! Resolved dependencies

use crate::config::{BuildConfig, Config, DependencyConfig, DeployConfig};
use crate::dependency::source::{DependencyId, DependencySource};
use crate::state::{GeneratedState, DEFAULT_PROFILE};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A dependency produced by one resolution run
///
/// Each identity is resolved at most once per run; everything that refers to
/// it shares the same `Arc<Dependency>`.
pub struct Dependency {
    /// Stable identity (source + activated profile)
    pub id: DependencyId,

    /// Display name from the declaration or the loaded configuration
    pub name: Option<String>,

    /// Where the code came from
    pub source: DependencySource,

    /// Loaded configuration with the profile and parent overrides applied
    pub config: Config,

    /// Directory the source was materialized to
    pub local_path: PathBuf,

    /// Profile activated in this dependency
    pub profile: Option<String>,

    /// Content hash of `local_path` computed during this run
    pub hash: String,

    /// Generated state of the project at `local_path`
    pub state: Arc<GeneratedState>,

    /// Identities this dependency declares, in declaration order
    pub children: Vec<DependencyId>,

    pub skip_build: bool,
    pub skip_deploy: bool,
}

impl Dependency {
    /// Profile name this dependency's cache entries are stored under
    pub fn cache_profile(&self) -> &str {
        self.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }

    /// Short label for log lines and tables
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Variables exported to this dependency's commands
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.config.vars
    }

    pub fn build_config(&self) -> Option<&BuildConfig> {
        self.config.build.as_ref()
    }

    pub fn deploy_config(&self) -> Option<&DeployConfig> {
        self.config.deploy.as_ref()
    }

    /// Source hash recorded by the last successful build
    pub async fn stored_hash(&self) -> Option<String> {
        self.state
            .dependency_hash(self.cache_profile(), self.id.as_str())
            .await
    }

    /// Source hash recorded by the last successful deploy
    pub async fn deployed_hash(&self) -> Option<String> {
        self.state
            .deployment_hash(self.cache_profile(), self.id.as_str())
            .await
    }

    /// Whether the tree changed since the last successful build
    pub async fn is_stale(&self) -> bool {
        self.stored_hash().await.as_deref() != Some(self.hash.as_str())
    }

    /// Whether a build is due, honoring `skip_build` and a force flag
    pub async fn needs_build(&self, force: bool) -> bool {
        !self.skip_build && (force || self.is_stale().await)
    }

    /// Whether `declaration` would resolve to the same flags and vars
    pub fn matches_declaration(&self, declaration: &DependencyConfig) -> bool {
        self.skip_build == declaration.skip_build
            && self.skip_deploy == declaration.skip_deploy
            && declaration
                .vars
                .iter()
                .all(|(key, value)| self.config.vars.get(key) == Some(value))
    }

    /// Whether a deploy is due, honoring `skip_deploy` and a force flag
    pub async fn needs_deploy(&self, force: bool) -> bool {
        if self.skip_deploy {
            return false;
        }
        force || self.deployed_hash().await.as_deref() != Some(self.hash.as_str())
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("id", &self.id)
            .field("local_path", &self.local_path)
            .field("hash", &self.hash)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

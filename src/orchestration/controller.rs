//! Build and deploy capabilities
//!
//! The manager never talks to a concrete toolchain. It hands each
//! dependency to a [`Builder`] or [`Deployer`], so backends can be swapped
//! (or faked in tests) without touching the orchestration logic.

use crate::dependency::Dependency;
use crate::error::RiggerResult;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Builds a dependency's artifacts
#[async_trait]
pub trait Builder: Send + Sync {
    /// Build the dependency at its local path with its own profile
    ///
    /// Returns the produced tag for each artifact id.
    async fn build(
        &self,
        dependency: &Dependency,
        options: &BuildOptions,
    ) -> RiggerResult<BTreeMap<String, String>>;
}

/// Deploys and tears down a dependency
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Deploy the dependency
    async fn deploy(&self, dependency: &Dependency, options: &DeployOptions) -> RiggerResult<()>;

    /// Remove what `deploy` created
    async fn purge(&self, dependency: &Dependency, verbose: bool) -> RiggerResult<()>;
}

/// Options for `Manager::build_all`
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Rebuild even when the content hash is unchanged
    pub force_build: bool,

    /// Keep building unrelated dependencies after a failure
    pub continue_on_error: bool,

    /// Maximum builds in flight
    pub concurrency: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            force_build: false,
            continue_on_error: false,
            concurrency: 1,
        }
    }
}

/// Options for `Manager::deploy_all`
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Deploy without building first
    pub skip_build: bool,

    /// Rebuild even when the content hash is unchanged
    pub force_build: bool,

    /// Redeploy even when the deployed hash is unchanged
    pub force_deploy: bool,

    /// Keep deploying unrelated dependencies after a failure
    pub continue_on_error: bool,

    /// Maximum deploys in flight
    pub concurrency: usize,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            skip_build: false,
            force_build: false,
            force_deploy: false,
            continue_on_error: false,
            concurrency: 1,
        }
    }
}

impl DeployOptions {
    /// Options for the build that precedes each deploy
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            force_build: self.force_build,
            continue_on_error: self.continue_on_error,
            concurrency: self.concurrency,
        }
    }
}

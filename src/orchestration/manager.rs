//! Orchestration manager
//!
//! Entry point for the build, deploy, update and purge operations. Every
//! operation resolves the dependency graph first, then fans the work out in
//! build order (purge in reverse), and finally checkpoints the generated
//! state of every project it touched.

use crate::config::{Config, ConfigLoader, FileConfigLoader, LoadOptions};
use crate::dependency::{
    Dependency, DependencyResolver, GitFetcher, Resolution, Resolver, SourceFetcher,
};
use crate::error::{RiggerError, RiggerResult};
use crate::orchestration::controller::{BuildOptions, Builder, DeployOptions, Deployer};
use crate::orchestration::schedule::run_ordered;
use crate::orchestration::shell::{ShellBuilder, ShellDeployer};
use crate::state::{FileStateStore, GeneratedConfig, GeneratedState, StateStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pluggable collaborators of the manager
#[derive(Clone)]
pub struct Collaborators {
    pub loader: Arc<dyn ConfigLoader>,
    pub fetcher: Arc<dyn SourceFetcher>,
    pub builder: Arc<dyn Builder>,
    pub deployer: Arc<dyn Deployer>,
    pub store: Arc<dyn StateStore>,
}

impl Collaborators {
    /// File-backed configuration and state, git sources, shell commands
    pub fn defaults(options: &LoadOptions) -> Self {
        Self {
            loader: Arc::new(FileConfigLoader::with_file_name(&options.config_file)),
            fetcher: Arc::new(GitFetcher::new(&options.checkout_dir)),
            builder: Arc::new(ShellBuilder::new()),
            deployer: Arc::new(ShellDeployer::new()),
            store: Arc::new(FileStateStore::new()),
        }
    }
}

/// Drives resolution and fans operations out across the resolved graph
pub struct Manager {
    root_dir: PathBuf,
    root_state: Arc<GeneratedState>,
    resolver: Box<dyn DependencyResolver>,
    builder: Arc<dyn Builder>,
    deployer: Arc<dyn Deployer>,
    store: Arc<dyn StateStore>,
}

impl Manager {
    /// Create a manager for the project at `root_dir`
    ///
    /// `config` is the root project's activated configuration and `cached`
    /// its generated state as loaded at startup. `resolver` replaces the
    /// default [`Resolver`] when given.
    pub fn new(
        root_dir: impl Into<PathBuf>,
        config: Config,
        cached: GeneratedConfig,
        resolver: Option<Box<dyn DependencyResolver>>,
        allow_cyclic: bool,
        options: LoadOptions,
        collaborators: Collaborators,
    ) -> Self {
        let root_dir = root_dir.into();
        let root_state = Arc::new(GeneratedState::new(&root_dir, cached));

        let resolver = resolver.unwrap_or_else(|| {
            Box::new(Resolver::new(
                &root_dir,
                config,
                Arc::clone(&root_state),
                allow_cyclic,
                options,
                Arc::clone(&collaborators.loader),
                Arc::clone(&collaborators.fetcher),
                Arc::clone(&collaborators.store),
            ))
        });

        Self {
            root_dir,
            root_state,
            resolver,
            builder: collaborators.builder,
            deployer: collaborators.deployer,
            store: collaborators.store,
        }
    }

    /// Project directory this manager operates on
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Generated state of the root project
    pub fn root_state(&self) -> &Arc<GeneratedState> {
        &self.root_state
    }

    /// Resolve the dependency graph without touching anything
    pub async fn list(&self) -> RiggerResult<Resolution> {
        self.resolver.resolve(false).await
    }

    /// Build every dependency whose sources changed
    pub async fn build_all(&self, options: &BuildOptions) -> RiggerResult<()> {
        let resolution = self.resolver.resolve(false).await?;
        let mut errors = resolution.failures;

        errors.extend(
            run_ordered(
                &resolution.dependencies,
                options.concurrency,
                options.continue_on_error,
                move |dep| async move { self.build_one(&dep, options).await.map(|_| ()) },
            )
            .await,
        );

        self.finish(&resolution.dependencies, errors).await
    }

    /// Build (unless skipped) and deploy every dependency
    pub async fn deploy_all(&self, options: &DeployOptions) -> RiggerResult<()> {
        let resolution = self.resolver.resolve(false).await?;
        let mut errors = resolution.failures;
        let build_options = &options.build_options();

        errors.extend(
            run_ordered(
                &resolution.dependencies,
                options.concurrency,
                options.continue_on_error,
                move |dep| async move {
                    let built = if options.skip_build {
                        false
                    } else {
                        self.build_one(&dep, build_options).await?
                    };
                    self.deploy_one(&dep, options, built).await
                },
            )
            .await,
        );

        self.finish(&resolution.dependencies, errors).await
    }

    /// Refresh every remote source and recompute every content hash
    ///
    /// Nothing is built or deployed and no stored hash is written; the next
    /// build or deploy compares against the refreshed trees.
    pub async fn update_all(&self) -> RiggerResult<()> {
        let resolution = self.resolver.resolve(true).await?;

        for dep in &resolution.dependencies {
            if dep.is_stale().await {
                info!("{} has changes to build", dep.label());
            } else {
                debug!("{} is up to date", dep.label());
            }
        }

        self.finish(&resolution.dependencies, resolution.failures)
            .await
    }

    /// Tear down every deployed dependency, dependents first
    ///
    /// Every purge is attempted even after failures. With `verbose` set,
    /// failures are reported as warnings and the call succeeds.
    pub async fn purge_all(&self, verbose: bool) -> RiggerResult<()> {
        let resolution = self.resolver.resolve(false).await?;
        let mut errors = resolution.failures;

        for dep in resolution.dependencies.iter().rev() {
            if dep.skip_deploy {
                debug!("Skipping purge of {} (skip_deploy)", dep.label());
                continue;
            }

            match self.deployer.purge(dep, verbose).await {
                Ok(()) => {
                    dep.state
                        .clear_deploy(dep.cache_profile(), dep.id.as_str())
                        .await;
                    info!("Purged {}", dep.label());
                }
                Err(e) => {
                    let err = RiggerError::Purge {
                        dependency: dep.id.to_string(),
                        source: Box::new(e),
                    };
                    if verbose {
                        warn!("{}", err);
                    } else {
                        errors.push(err);
                    }
                }
            }
        }

        self.finish(&resolution.dependencies, errors).await
    }

    /// Build one dependency if it is due; returns whether the builder ran
    async fn build_one(&self, dep: &Dependency, options: &BuildOptions) -> RiggerResult<bool> {
        if dep.skip_build {
            info!("Skipping build of {} (skip_build)", dep.label());
            return Ok(false);
        }
        if !dep.needs_build(options.force_build).await {
            info!("Skipping build of {} (up to date)", dep.label());
            return Ok(false);
        }

        let images = self
            .builder
            .build(dep, options)
            .await
            .map_err(|e| RiggerError::Build {
                dependency: dep.id.to_string(),
                source: Box::new(e),
            })?;

        dep.state
            .record_build(dep.cache_profile(), dep.id.as_str(), &dep.hash, images)
            .await;
        info!("Built {}", dep.label());
        Ok(true)
    }

    async fn deploy_one(
        &self,
        dep: &Dependency,
        options: &DeployOptions,
        built: bool,
    ) -> RiggerResult<()> {
        if dep.skip_deploy {
            info!("Skipping deploy of {} (skip_deploy)", dep.label());
            return Ok(());
        }
        if !built && !dep.needs_deploy(options.force_deploy).await {
            info!("Skipping deploy of {} (already deployed)", dep.label());
            return Ok(());
        }

        self.deployer
            .deploy(dep, options)
            .await
            .map_err(|e| RiggerError::Deploy {
                dependency: dep.id.to_string(),
                source: Box::new(e),
            })?;

        dep.state
            .record_deploy(dep.cache_profile(), dep.id.as_str(), &dep.hash)
            .await;
        info!("Deployed {}", dep.label());
        Ok(())
    }

    /// Checkpoint every touched document, then report the collected errors
    async fn finish(
        &self,
        dependencies: &[Arc<Dependency>],
        mut errors: Vec<RiggerError>,
    ) -> RiggerResult<()> {
        let mut states: Vec<&Arc<GeneratedState>> = vec![&self.root_state];
        for dep in dependencies {
            if !states.iter().any(|s| Arc::ptr_eq(s, &dep.state)) {
                states.push(&dep.state);
            }
        }

        for state in states {
            if let Err(e) = state.checkpoint(self.store.as_ref()).await {
                warn!("Could not save state for {}: {}", state.root().display(), e);
                errors.push(e);
            }
        }

        match RiggerError::aggregate(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

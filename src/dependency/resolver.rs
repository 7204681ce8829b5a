//! Recursive dependency resolution
//!
//! Walks the declared dependencies depth-first, loading each dependency's
//! configuration and recursing into what it declares. The walk keeps the
//! chain of identities currently being resolved (cycle detection) and an
//! identity-keyed map of finished dependencies (each identity is resolved
//! once per run).
//!
//! Dependencies are appended to the result when their own subtree is done,
//! so the list is a valid build order: every dependency comes before the
//! dependents that declare it.

use crate::config::{Config, ConfigLoader, DependencyConfig, LoadOptions};
use crate::dependency::fetch::SourceFetcher;
use crate::dependency::resolved::Dependency;
use crate::dependency::source::{normalize_path, DependencyId, DependencySource};
use crate::error::{RiggerError, RiggerResult};
use crate::hash::directory_hash_async;
use crate::state::{GeneratedState, StateStore, DEFAULT_PROFILE};
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Produces the ordered dependency list of a project
#[async_trait]
pub trait DependencyResolver: Send + Sync {
    /// Resolve every declared dependency
    ///
    /// With `update` set, remote sources are refreshed instead of reusing
    /// their existing checkouts.
    async fn resolve(&self, update: bool) -> RiggerResult<Resolution>;
}

/// Outcome of one resolution run
#[derive(Debug, Default)]
pub struct Resolution {
    /// Resolved dependencies in build order
    pub dependencies: Vec<Arc<Dependency>>,

    /// One error per top-level declaration that could not be resolved
    pub failures: Vec<RiggerError>,
}

impl Resolution {
    /// Whether every declaration resolved
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Bookkeeping for a single resolution run
struct ResolveRun {
    update: bool,

    /// Identities on the current recursion path, outermost first
    ancestors: Vec<DependencyId>,
    resolving: HashSet<DependencyId>,

    resolved: HashMap<DependencyId, Arc<Dependency>>,
    failed: HashMap<DependencyId, String>,
    order: Vec<Arc<Dependency>>,

    /// Generated state per project directory, shared between identities
    states: HashMap<PathBuf, Arc<GeneratedState>>,
}

impl ResolveRun {
    fn new(update: bool) -> Self {
        Self {
            update,
            ancestors: Vec::new(),
            resolving: HashSet::new(),
            resolved: HashMap::new(),
            failed: HashMap::new(),
            order: Vec::new(),
            states: HashMap::new(),
        }
    }

    fn enter(&mut self, id: DependencyId) {
        self.resolving.insert(id.clone());
        self.ancestors.push(id);
    }

    fn leave(&mut self) {
        if let Some(id) = self.ancestors.pop() {
            self.resolving.remove(&id);
        }
    }

    /// Chain from the first occurrence of `id` back to `id`
    fn cycle_path(&self, id: &DependencyId) -> Vec<String> {
        let start = self
            .ancestors
            .iter()
            .position(|ancestor| ancestor == id)
            .unwrap_or(0);
        self.ancestors[start..]
            .iter()
            .chain(std::iter::once(id))
            .map(|id| id.to_string())
            .collect()
    }

    async fn state_for(
        &mut self,
        dir: &Path,
        store: &dyn StateStore,
    ) -> RiggerResult<Arc<GeneratedState>> {
        let key = normalize_path(dir);
        if let Some(state) = self.states.get(&key) {
            return Ok(Arc::clone(state));
        }

        let state = Arc::new(GeneratedState::load(store, &key).await?);
        self.states.insert(key, Arc::clone(&state));
        Ok(state)
    }
}

/// Default resolver: loads configurations from disk, fetches remote sources
pub struct Resolver {
    root_dir: PathBuf,
    root_config: Config,
    root_state: Arc<GeneratedState>,
    allow_cyclic: bool,
    options: LoadOptions,
    loader: Arc<dyn ConfigLoader>,
    fetcher: Arc<dyn SourceFetcher>,
    store: Arc<dyn StateStore>,
}

impl Resolver {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        root_dir: impl Into<PathBuf>,
        root_config: Config,
        root_state: Arc<GeneratedState>,
        allow_cyclic: bool,
        options: LoadOptions,
        loader: Arc<dyn ConfigLoader>,
        fetcher: Arc<dyn SourceFetcher>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            root_dir: normalize_path(&root_dir.into()),
            root_config,
            root_state,
            allow_cyclic,
            options,
            loader,
            fetcher,
            store,
        }
    }

    /// Resolve one declaration and everything below it
    ///
    /// Returns `None` for the back-edge of a tolerated cycle.
    fn resolve_one<'a>(
        &'a self,
        run: &'a mut ResolveRun,
        base_dir: &'a Path,
        declaration: &'a DependencyConfig,
    ) -> BoxFuture<'a, RiggerResult<Option<DependencyId>>> {
        async move {
            let source = DependencySource::from_config(&declaration.source, base_dir)?;
            let id = DependencyId::new(&source, declaration.profile.as_deref());

            if run.resolving.contains(&id) {
                if self.allow_cyclic {
                    debug!("Not descending into {} again (cycle)", id);
                    return Ok(None);
                }
                return Err(RiggerError::Cycle {
                    path: run.cycle_path(&id),
                });
            }

            if let Some(existing) = run.resolved.get(&id) {
                if !existing.matches_declaration(declaration) {
                    warn!(
                        "{} declared again with different settings, keeping the first",
                        id
                    );
                }
                return Ok(Some(id));
            }

            if let Some(reason) = run.failed.get(&id) {
                return Err(RiggerError::Unresolved {
                    dependency: id.to_string(),
                    reason: reason.clone(),
                });
            }

            run.enter(id.clone());
            let result = self.load_dependency(run, &id, source, declaration).await;
            run.leave();

            match result {
                Ok(dependency) => {
                    run.resolved.insert(id.clone(), Arc::clone(&dependency));
                    run.order.push(dependency);
                    Ok(Some(id))
                }
                Err(e) => {
                    if !e.is_cycle() {
                        run.failed.insert(id, e.to_string());
                    }
                    Err(e)
                }
            }
        }
        .boxed()
    }

    async fn load_dependency(
        &self,
        run: &mut ResolveRun,
        id: &DependencyId,
        source: DependencySource,
        declaration: &DependencyConfig,
    ) -> RiggerResult<Arc<Dependency>> {
        let local_path = match source {
            DependencySource::Path(ref path) => {
                if !path.is_dir() {
                    return Err(RiggerError::PathNotFound(path.clone()));
                }
                path.clone()
            }
            DependencySource::Git(ref git) => self.fetcher.fetch(git, run.update).await?,
        };

        let mut config = self
            .loader
            .load(&local_path, declaration.profile.as_deref())
            .await?;
        config.override_vars(&declaration.vars);

        let hash = directory_hash_async(local_path.clone(), self.options.excludes.clone()).await?;
        let state = run.state_for(&local_path, self.store.as_ref()).await?;

        let mut children = Vec::with_capacity(config.dependencies.len());
        for child in &config.dependencies {
            if let Some(child_id) = self.resolve_one(run, &local_path, child).await? {
                if !children.contains(&child_id) {
                    children.push(child_id);
                }
            }
        }

        let profile = declaration.profile.clone();
        let cache_profile = profile.as_deref().unwrap_or(DEFAULT_PROFILE);
        match state.dependency_hash(cache_profile, id.as_str()).await {
            Some(ref stored) if stored == &hash => debug!("{} unchanged ({})", id, hash),
            Some(_) => info!("{} changed since its last build", id),
            None => info!("{} has not been built yet", id),
        }

        Ok(Arc::new(Dependency {
            id: id.clone(),
            name: declaration.name.clone().or_else(|| config.name.clone()),
            source,
            config,
            local_path,
            profile,
            hash,
            state,
            children,
            skip_build: declaration.skip_build,
            skip_deploy: declaration.skip_deploy,
        }))
    }
}

#[async_trait]
impl DependencyResolver for Resolver {
    async fn resolve(&self, update: bool) -> RiggerResult<Resolution> {
        let mut run = ResolveRun::new(update);

        let root_profile = self.root_state.active_profile().await;
        let root_id = DependencyId::new(
            &DependencySource::Path(self.root_dir.clone()),
            root_profile.as_deref(),
        );
        run.states
            .insert(self.root_dir.clone(), Arc::clone(&self.root_state));
        run.enter(root_id);

        let mut failures = Vec::new();
        for declaration in &self.root_config.dependencies {
            match self.resolve_one(&mut run, &self.root_dir, declaration).await {
                Ok(_) => {}
                Err(e) if e.is_cycle() => return Err(e),
                Err(e) => {
                    warn!("Could not resolve {}: {}", declaration.label(), e);
                    failures.push(e);
                }
            }
        }

        debug!(
            "Resolved {} dependencies ({} failed)",
            run.order.len(),
            failures.len()
        );
        Ok(Resolution {
            dependencies: run.order,
            failures,
        })
    }
}

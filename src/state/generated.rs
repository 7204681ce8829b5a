//! Generated state documents
//!
//! One document per project root, keyed by profile name. Each profile
//! remembers the source hash last built and deployed for every dependency
//! identity, and the last image tag produced for every build artifact.

use crate::error::RiggerResult;
use crate::state::store::StateStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Profile name used when no profile is activated
pub const DEFAULT_PROFILE: &str = "default";

/// Last known image for a build artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCache {
    /// Image tag produced by the last successful build
    pub tag: String,

    /// When the tag was recorded
    pub built_at: DateTime<Utc>,
}

/// Cached state for one profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Dependency identity -> source hash of the last successful build
    pub dependencies: BTreeMap<String, String>,

    /// Dependency identity -> source hash of the last successful deploy
    pub deployments: BTreeMap<String, String>,

    /// Artifact identity -> last built image
    pub images: BTreeMap<String, ImageCache>,
}

/// Persisted generated state for a project root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedConfig {
    /// Profile the project was last used with
    pub active_profile: Option<String>,

    /// Cached state per profile name
    pub profiles: BTreeMap<String, CacheConfig>,
}

impl GeneratedConfig {
    /// Cache for a profile, if one was recorded
    pub fn profile(&self, name: &str) -> Option<&CacheConfig> {
        self.profiles.get(name)
    }

    /// Cache for a profile, created empty on first use
    pub fn profile_mut(&mut self, name: &str) -> &mut CacheConfig {
        self.profiles.entry(name.to_string()).or_default()
    }
}

/// In-memory handle on one project root's generated state
///
/// Readers share the lock; every mutation takes it exclusively, so writes
/// to the same profile are serialized. Nothing reaches disk until
/// [`GeneratedState::checkpoint`] is called.
#[derive(Debug)]
pub struct GeneratedState {
    root: PathBuf,
    doc: RwLock<GeneratedConfig>,
    dirty: AtomicBool,
}

impl GeneratedState {
    /// Wrap an already loaded document
    pub fn new(root: impl Into<PathBuf>, doc: GeneratedConfig) -> Self {
        Self {
            root: root.into(),
            doc: RwLock::new(doc),
            dirty: AtomicBool::new(false),
        }
    }

    /// Load the document for `root` from a store
    pub async fn load(store: &dyn StateStore, root: &Path) -> RiggerResult<Self> {
        let doc = store.load(root).await?;
        Ok(Self::new(root, doc))
    }

    /// Project root this state belongs to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether there are mutations not yet checkpointed
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Active profile recorded in the document
    pub async fn active_profile(&self) -> Option<String> {
        self.doc.read().await.active_profile.clone()
    }

    /// Stored build hash for a dependency identity
    pub async fn dependency_hash(&self, profile: &str, id: &str) -> Option<String> {
        let doc = self.doc.read().await;
        doc.profile(profile)
            .and_then(|cache| cache.dependencies.get(id).cloned())
    }

    /// Stored deploy hash for a dependency identity
    pub async fn deployment_hash(&self, profile: &str, id: &str) -> Option<String> {
        let doc = self.doc.read().await;
        doc.profile(profile)
            .and_then(|cache| cache.deployments.get(id).cloned())
    }

    /// Last known image tags of a profile
    pub async fn images(&self, profile: &str) -> BTreeMap<String, ImageCache> {
        let doc = self.doc.read().await;
        doc.profile(profile)
            .map(|cache| cache.images.clone())
            .unwrap_or_default()
    }

    /// Apply one mutation to a profile's cache as a single unit
    pub async fn update<R>(&self, profile: &str, f: impl FnOnce(&mut CacheConfig) -> R) -> R {
        let mut doc = self.doc.write().await;
        let result = f(doc.profile_mut(profile));
        self.dirty.store(true, Ordering::SeqCst);
        result
    }

    /// Record a completed build: source hash and produced image tags together
    pub async fn record_build(
        &self,
        profile: &str,
        id: &str,
        hash: &str,
        images: BTreeMap<String, String>,
    ) {
        let now = Utc::now();
        self.update(profile, |cache| {
            cache.dependencies.insert(id.to_string(), hash.to_string());
            for (artifact, tag) in images {
                cache.images.insert(artifact, ImageCache { tag, built_at: now });
            }
        })
        .await;
        debug!("Recorded build of {} ({}) in profile {}", id, hash, profile);
    }

    /// Record a completed deploy
    pub async fn record_deploy(&self, profile: &str, id: &str, hash: &str) {
        self.update(profile, |cache| {
            cache.deployments.insert(id.to_string(), hash.to_string());
        })
        .await;
    }

    /// Forget a deployment after it was purged
    pub async fn clear_deploy(&self, profile: &str, id: &str) {
        self.update(profile, |cache| {
            cache.deployments.remove(id);
        })
        .await;
    }

    /// Persist the document if it changed since the last checkpoint
    ///
    /// Returns whether anything was written.
    pub async fn checkpoint(&self, store: &dyn StateStore) -> RiggerResult<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }

        // Hold the read lock while saving so no mutation lands between the
        // save and clearing the dirty flag.
        let doc = self.doc.read().await;
        store.save(&self.root, &doc).await?;
        self.dirty.store(false, Ordering::SeqCst);

        debug!("Checkpointed generated state for {}", self.root.display());
        Ok(true)
    }
}

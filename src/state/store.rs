//! Storage backends for generated state
//!
//! The file store keeps one JSON document per project root at
//! `{root}/.rigger/generated.json` and replaces it atomically: the new
//! content is written and synced to a temporary file, then renamed over
//! the old one, so a crash leaves either the old or the new document.

use crate::error::{RiggerError, RiggerResult};
use crate::state::generated::GeneratedConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Directory under a project root holding rigger's generated files
pub const STATE_DIR: &str = ".rigger";

/// File name of the generated state document
pub const STATE_FILE: &str = "generated.json";

/// Persistence for generated state documents
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the document for a project root; a missing document is empty
    async fn load(&self, root: &Path) -> RiggerResult<GeneratedConfig>;

    /// Replace the document for a project root
    async fn save(&self, root: &Path, config: &GeneratedConfig) -> RiggerResult<()>;
}

/// JSON files under each project root
#[derive(Debug, Clone, Default)]
pub struct FileStateStore;

impl FileStateStore {
    /// Create a file-backed store
    pub fn new() -> Self {
        Self
    }

    /// Path of the document for a project root
    pub fn state_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(STATE_FILE)
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, root: &Path) -> RiggerResult<GeneratedConfig> {
        let path = Self::state_path(root);

        if !path.exists() {
            debug!("No generated state at {}, starting empty", path.display());
            return Ok(GeneratedConfig::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| RiggerError::io(format!("reading generated state {}", path.display()), e))?;

        serde_json::from_str(&content).map_err(|e| RiggerError::StateCorrupt {
            path,
            reason: e.to_string(),
        })
    }

    async fn save(&self, root: &Path, config: &GeneratedConfig) -> RiggerResult<()> {
        let path = Self::state_path(root);
        let content = serde_json::to_string_pretty(config)?;
        atomic_write(&path, content.as_bytes()).await?;

        debug!("Saved generated state to {}", path.display());
        Ok(())
    }
}

/// Write a file by writing a synced sibling temp file and renaming it
pub async fn atomic_write(path: &Path, content: &[u8]) -> RiggerResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RiggerError::io(format!("creating directory {}", parent.display()), e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| RiggerError::io(format!("creating {}", temp_path.display()), e))?;
        file.write_all(content)
            .await
            .map_err(|e| RiggerError::io(format!("writing {}", temp_path.display()), e))?;
        file.sync_all()
            .await
            .map_err(|e| RiggerError::io(format!("syncing {}", temp_path.display()), e))?;
    }

    fs::rename(&temp_path, path).await.map_err(|e| {
        RiggerError::io(
            format!("renaming {} to {}", temp_path.display(), path.display()),
            e,
        )
    })
}

/// In-process store, mainly for tests
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    docs: Mutex<HashMap<PathBuf, GeneratedConfig>>,
    saves: Mutex<usize>,
}

impl MemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the document for a root
    pub fn insert(&self, root: impl Into<PathBuf>, config: GeneratedConfig) {
        if let Ok(mut docs) = self.docs.lock() {
            docs.insert(root.into(), config);
        }
    }

    /// Current document for a root, if one was saved or seeded
    pub fn get(&self, root: impl AsRef<Path>) -> Option<GeneratedConfig> {
        self.docs
            .lock()
            .ok()
            .and_then(|docs| docs.get(root.as_ref()).cloned())
    }

    /// Number of saves performed
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, root: &Path) -> RiggerResult<GeneratedConfig> {
        Ok(self.get(root).unwrap_or_default())
    }

    async fn save(&self, root: &Path, config: &GeneratedConfig) -> RiggerResult<()> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| RiggerError::Internal("state store lock poisoned".to_string()))?;
        docs.insert(root.to_path_buf(), config.clone());

        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

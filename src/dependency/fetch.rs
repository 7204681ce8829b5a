//! Fetching remote dependency sources
//!
//! Git dependencies are checked out once under the checkout directory and
//! reused on later runs. A refresh (`update`) fetches and moves the
//! checkout to the requested revision.

use crate::dependency::source::{GitRevision, GitSource};
use crate::error::{RiggerError, RiggerResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Materializes remote sources on the local filesystem
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Return the local directory holding `source`
    ///
    /// An existing checkout is reused as-is unless `update` is set.
    async fn fetch(&self, source: &GitSource, update: bool) -> RiggerResult<PathBuf>;
}

/// Fetches sources with the `git` CLI
#[derive(Debug, Clone)]
pub struct GitFetcher {
    checkout_dir: PathBuf,
}

impl GitFetcher {
    /// Create a fetcher keeping checkouts under `checkout_dir`
    pub fn new(checkout_dir: impl Into<PathBuf>) -> Self {
        Self {
            checkout_dir: checkout_dir.into(),
        }
    }

    /// Directory a repository + revision is checked out to
    pub fn checkout_path(&self, source: &GitSource) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(source.url.as_bytes());
        if let Some(ref revision) = source.revision {
            hasher.update(b"@");
            hasher.update(revision.name().as_bytes());
        }
        let key = hex::encode(&hasher.finalize()[..6]);
        self.checkout_dir.join(key)
    }

    /// Execute a git command and return its stdout
    async fn git(&self, args: &[&str], cwd: Option<&Path>) -> RiggerResult<String> {
        debug!("Executing: git {:?}", args);

        let mut command = Command::new("git");
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| RiggerError::command_failed(format!("git {:?}", args), e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(RiggerError::command_exec(
                format!("git {}", args.join(" ")),
                String::from_utf8_lossy(&output.stderr).trim(),
            ))
        }
    }

    async fn clone_repo(&self, source: &GitSource, repo: &Path) -> RiggerResult<()> {
        if let Some(parent) = repo.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RiggerError::io(format!("creating {}", parent.display()), e))?;
        }

        let target = repo.to_string_lossy().to_string();
        let mut args = vec!["clone", "--quiet"];
        if let Some(GitRevision::Branch(name) | GitRevision::Tag(name)) = &source.revision {
            args.extend(["--branch", name.as_str()]);
        }
        args.extend([source.url.as_str(), target.as_str()]);

        info!("Cloning {}", source);
        self.git(&args, None).await?;

        if let Some(GitRevision::Commit(commit)) = &source.revision {
            self.git(&["checkout", "--quiet", commit], Some(repo)).await?;
        }
        Ok(())
    }

    async fn refresh_repo(&self, source: &GitSource, repo: &Path) -> RiggerResult<()> {
        info!("Updating {}", source);
        self.git(&["fetch", "--quiet", "--tags", "origin"], Some(repo))
            .await?;

        match &source.revision {
            Some(GitRevision::Branch(branch)) => {
                let upstream = format!("origin/{}", branch);
                self.git(&["checkout", "--quiet", branch], Some(repo)).await?;
                self.git(&["reset", "--quiet", "--hard", &upstream], Some(repo))
                    .await?;
            }
            Some(GitRevision::Tag(tag)) => {
                let tag_ref = format!("tags/{}", tag);
                self.git(&["checkout", "--quiet", &tag_ref], Some(repo)).await?;
            }
            Some(GitRevision::Commit(commit)) => {
                self.git(&["checkout", "--quiet", commit], Some(repo)).await?;
            }
            None => {
                self.git(&["pull", "--quiet", "--ff-only"], Some(repo)).await?;
            }
        }
        Ok(())
    }

    async fn materialize(&self, source: &GitSource, update: bool) -> RiggerResult<PathBuf> {
        let repo = self.checkout_path(source);

        if !repo.join(".git").exists() {
            if let Err(e) = self.clone_repo(source, &repo).await {
                // A half-finished clone would be mistaken for a checkout next time
                if let Err(cleanup) = fs::remove_dir_all(&repo).await {
                    debug!("Could not remove partial clone {}: {}", repo.display(), cleanup);
                }
                return Err(e);
            }
        } else if update {
            self.refresh_repo(source, &repo).await?;
        } else {
            debug!("Reusing checkout {} for {}", repo.display(), source);
        }

        let local = match source.sub_path {
            Some(ref sub_path) => repo.join(sub_path),
            None => repo,
        };

        if !local.is_dir() {
            return Err(RiggerError::PathNotFound(local));
        }
        Ok(local)
    }
}

#[async_trait]
impl SourceFetcher for GitFetcher {
    async fn fetch(&self, source: &GitSource, update: bool) -> RiggerResult<PathBuf> {
        self.materialize(source, update).await.map_err(|e| {
            warn!("Fetching {} failed: {}", source, e);
            RiggerError::SourceFetch {
                source_ref: source.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

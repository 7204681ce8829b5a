//! Dependency sources and identities

use crate::config::SourceConfig;
use crate::error::{RiggerError, RiggerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Git revision to check out
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GitRevision {
    Branch(String),
    Tag(String),
    Commit(String),
}

impl GitRevision {
    /// The ref name passed to git
    pub fn name(&self) -> &str {
        match self {
            Self::Branch(name) | Self::Tag(name) | Self::Commit(name) => name,
        }
    }
}

/// A dependency living in a git repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitSource {
    /// Repository URL
    pub url: String,

    /// Revision to check out (remote default branch when unset)
    pub revision: Option<GitRevision>,

    /// Project directory inside the repository
    pub sub_path: Option<PathBuf>,
}

impl fmt::Display for GitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        if let Some(ref revision) = self.revision {
            write!(f, "@{}", revision.name())?;
        }
        if let Some(ref sub_path) = self.sub_path {
            write!(f, ":{}", slash_path(sub_path))?;
        }
        Ok(())
    }
}

/// Where a dependency's code lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencySource {
    /// Local directory (absolute, normalized)
    Path(PathBuf),

    /// Remote git repository
    Git(GitSource),
}

impl DependencySource {
    /// Build a source from its declaration, resolving relative paths
    /// against the declaring project's directory
    pub fn from_config(config: &SourceConfig, base_dir: &Path) -> RiggerResult<Self> {
        let invalid = |reason: &str| RiggerError::ConfigInvalid {
            path: base_dir.to_path_buf(),
            reason: reason.to_string(),
        };

        match (&config.path, &config.git) {
            (Some(_), Some(_)) => Err(invalid(
                "dependency source sets both `path` and `git`; choose one",
            )),
            (None, None) => Err(invalid("dependency source must set `path` or `git`")),
            (Some(path), None) => Ok(Self::Path(normalize_path(&base_dir.join(path)))),
            (None, Some(url)) => {
                let revisions = [
                    config.branch.clone().map(GitRevision::Branch),
                    config.tag.clone().map(GitRevision::Tag),
                    config.revision.clone().map(GitRevision::Commit),
                ];
                let mut set = revisions.into_iter().flatten();
                let revision = set.next();
                if set.next().is_some() {
                    return Err(invalid(
                        "dependency source sets more than one of `branch`, `tag`, `revision`",
                    ));
                }
                if url.trim().is_empty() {
                    return Err(invalid("dependency source has an empty `git` URL"));
                }

                Ok(Self::Git(GitSource {
                    url: url.trim().to_string(),
                    revision,
                    sub_path: config.sub_path.clone(),
                }))
            }
        }
    }
}

impl fmt::Display for DependencySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "path:{}", slash_path(path)),
            Self::Git(git) => write!(f, "git:{}", git),
        }
    }
}

/// Stable identity of a dependency: its source plus activated profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyId(String);

impl DependencyId {
    /// Derive the identity of a source activated with a profile
    pub fn new(source: &DependencySource, profile: Option<&str>) -> Self {
        match profile {
            Some(profile) => Self(format!("{}#{}", source, profile)),
            None => Self(source.to_string()),
        }
    }

    /// Wrap an identity string as-is
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lexically normalize a path (resolve `.` and `..` without touching disk)
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

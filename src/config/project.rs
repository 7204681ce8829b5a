//! Project configuration schema
//!
//! Each project declares its own build and deploy steps and the projects it
//! depends on in `rigger.toml`:
//!
//! ```toml
//! name = "api"
//!
//! [vars]
//! REGISTRY = "registry.local:5000"
//!
//! [[dependencies]]
//! source = { path = "../database" }
//! profile = "dev"
//!
//! [[dependencies]]
//! source = { git = "https://github.com/acme/auth.git", branch = "main" }
//! skip_build = true
//!
//! [build]
//! command = "docker build -t $REGISTRY/api:$RIGGER_TAG ."
//! images = ["api"]
//!
//! [deploy]
//! command = "kubectl apply -f k8s/"
//! purge = "kubectl delete -f k8s/"
//!
//! [profiles.staging.vars]
//! REGISTRY = "registry.staging:5000"
//! ```

use crate::error::{RiggerError, RiggerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root of a project's `rigger.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name of the project
    pub name: Option<String>,

    /// Variables exported to build and deploy commands
    pub vars: BTreeMap<String, String>,

    /// Projects this project depends on, in resolution order
    pub dependencies: Vec<DependencyConfig>,

    /// How to build this project's images
    pub build: Option<BuildConfig>,

    /// How to deploy and tear down this project
    pub deploy: Option<DeployConfig>,

    /// Named variants of this configuration
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// A declared dependency on another project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Optional display name
    pub name: Option<String>,

    /// Where the dependency's code lives
    pub source: SourceConfig,

    /// Profile to activate in the dependency
    pub profile: Option<String>,

    /// Never build this dependency
    pub skip_build: bool,

    /// Never deploy (or purge) this dependency
    pub skip_deploy: bool,

    /// Variable values forced onto the dependency
    pub vars: BTreeMap<String, String>,
}

/// Location of a dependency: a local path or a git repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Local path, relative to the declaring project
    pub path: Option<PathBuf>,

    /// Git repository URL
    pub git: Option<String>,

    /// Branch to track
    pub branch: Option<String>,

    /// Tag to check out
    pub tag: Option<String>,

    /// Commit to check out
    pub revision: Option<String>,

    /// Project directory inside the repository
    pub sub_path: Option<PathBuf>,
}

/// Build step of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Shell command that builds the project's images
    pub command: String,

    /// Artifact ids the command produces
    pub images: Vec<String>,
}

/// Deploy step of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Shell command that deploys the project
    pub command: String,

    /// Shell command that removes what `command` deployed
    pub purge: Option<String>,
}

/// Overrides applied when a profile is activated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Variables merged over the base variables
    pub vars: BTreeMap<String, String>,

    /// Replaces the base dependency list when set
    pub dependencies: Option<Vec<DependencyConfig>>,

    /// Replaces the base build step when set
    pub build: Option<BuildConfig>,

    /// Replaces the base deploy step when set
    pub deploy: Option<DeployConfig>,
}

impl Config {
    /// Parse a configuration document
    pub fn parse(content: &str, path: &Path) -> RiggerResult<Self> {
        toml::from_str(content).map_err(|e| RiggerError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply a named profile, or return the base configuration for `None`
    pub fn activate(mut self, profile: Option<&str>, path: &Path) -> RiggerResult<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };

        let overrides = self
            .profiles
            .remove(name)
            .ok_or_else(|| RiggerError::ProfileNotFound {
                profile: name.to_string(),
                path: path.to_path_buf(),
            })?;

        self.vars.extend(overrides.vars);
        if let Some(dependencies) = overrides.dependencies {
            self.dependencies = dependencies;
        }
        if let Some(build) = overrides.build {
            self.build = Some(build);
        }
        if let Some(deploy) = overrides.deploy {
            self.deploy = Some(deploy);
        }

        Ok(self)
    }

    /// Force variable values onto this configuration
    pub fn override_vars(&mut self, vars: &BTreeMap<String, String>) {
        self.vars
            .extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl DependencyConfig {
    /// Short label for log lines
    pub fn label(&self) -> String {
        if let Some(ref name) = self.name {
            return name.clone();
        }
        match (&self.source.path, &self.source.git) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(url)) => url.clone(),
            (None, None) => "<unnamed>".to_string(),
        }
    }
}

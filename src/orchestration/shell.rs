//! Shell command backends
//!
//! Runs a dependency's `[build]` and `[deploy]` commands through `sh -c` in
//! the dependency's directory. Commands see the dependency's variables plus:
//!
//! - `RIGGER_DEPENDENCY`: identity of the dependency
//! - `RIGGER_PROFILE`: profile the dependency is cached under
//! - `RIGGER_TAG`: tag for this build (build only)
//! - `RIGGER_IMAGE_<ID>`: tag of each artifact (fresh for builds, last
//!   recorded for deploys and purges)

use crate::dependency::Dependency;
use crate::error::{RiggerError, RiggerResult};
use crate::orchestration::build_error_output;
use crate::orchestration::controller::{BuildOptions, Builder, DeployOptions, Deployer};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

/// Length of generated image tags
const TAG_LEN: usize = 7;

/// Generate a fresh random image tag
pub fn random_tag() -> String {
    Uuid::new_v4().simple().to_string()[..TAG_LEN].to_string()
}

/// Environment variable carrying an artifact's tag
pub fn image_env_name(artifact: &str) -> String {
    let id: String = artifact
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("RIGGER_IMAGE_{}", id)
}

fn base_env(dependency: &Dependency) -> BTreeMap<String, String> {
    let mut env = dependency.vars().clone();
    env.insert("RIGGER_DEPENDENCY".to_string(), dependency.id.to_string());
    env.insert(
        "RIGGER_PROFILE".to_string(),
        dependency.cache_profile().to_string(),
    );
    env
}

/// Run a shell command in `dir`, failing with its output tail on a non-zero exit
async fn run_shell(command: &str, dir: &Path, env: &BTreeMap<String, String>) -> RiggerResult<()> {
    debug!("Executing in {}: sh -c {:?}", dir.display(), command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(dir)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| RiggerError::command_failed(command, e))?;

    if output.status.success() {
        return Ok(());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut details = build_error_output(&stdout, &stderr);
    if details.is_empty() {
        details = match output.status.code() {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
    }
    Err(RiggerError::command_exec(command, details))
}

/// Runs `[build] command`
#[derive(Debug, Default, Clone)]
pub struct ShellBuilder;

impl ShellBuilder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Builder for ShellBuilder {
    async fn build(
        &self,
        dependency: &Dependency,
        _options: &BuildOptions,
    ) -> RiggerResult<BTreeMap<String, String>> {
        let Some(build) = dependency.build_config().filter(|b| !b.command.trim().is_empty())
        else {
            debug!("{} has no build command", dependency.id);
            return Ok(BTreeMap::new());
        };

        let tag = random_tag();
        let mut env = base_env(dependency);
        env.insert("RIGGER_TAG".to_string(), tag.clone());
        for image in &build.images {
            env.insert(image_env_name(image), tag.clone());
        }

        info!("Building {} (tag {})", dependency.label(), tag);
        run_shell(&build.command, &dependency.local_path, &env).await?;

        Ok(build
            .images
            .iter()
            .map(|image| (image.clone(), tag.clone()))
            .collect())
    }
}

/// Runs `[deploy] command` and `[deploy] purge`
#[derive(Debug, Default, Clone)]
pub struct ShellDeployer;

impl ShellDeployer {
    pub fn new() -> Self {
        Self
    }

    async fn env(&self, dependency: &Dependency) -> BTreeMap<String, String> {
        let mut env = base_env(dependency);
        for (image, cache) in dependency.state.images(dependency.cache_profile()).await {
            env.insert(image_env_name(&image), cache.tag);
        }
        env
    }
}

#[async_trait]
impl Deployer for ShellDeployer {
    async fn deploy(&self, dependency: &Dependency, _options: &DeployOptions) -> RiggerResult<()> {
        let Some(deploy) = dependency
            .deploy_config()
            .filter(|d| !d.command.trim().is_empty())
        else {
            debug!("{} has no deploy command", dependency.id);
            return Ok(());
        };

        info!("Deploying {}", dependency.label());
        let env = self.env(dependency).await;
        run_shell(&deploy.command, &dependency.local_path, &env).await
    }

    async fn purge(&self, dependency: &Dependency, verbose: bool) -> RiggerResult<()> {
        let Some(purge) = dependency
            .deploy_config()
            .and_then(|d| d.purge.as_deref())
            .filter(|cmd| !cmd.trim().is_empty())
        else {
            debug!("{} has no purge command", dependency.id);
            return Ok(());
        };

        if verbose {
            info!("Purging {} with `{}`", dependency.label(), purge);
        } else {
            info!("Purging {}", dependency.label());
        }
        let env = self.env(dependency).await;
        run_shell(purge, &dependency.local_path, &env).await
    }
}

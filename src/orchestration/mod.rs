//! Orchestration of build, deploy, update and purge across dependencies
//!
//! - [`controller`]: `Builder` / `Deployer` capabilities and their options
//! - [`shell`]: default backends running the project's shell commands
//! - [`manager`]: the `Manager` facade

pub mod controller;
pub mod manager;
mod schedule;
pub mod shell;

pub use controller::{BuildOptions, Builder, DeployOptions, Deployer};
pub use manager::{Collaborators, Manager};
pub use shell::{ShellBuilder, ShellDeployer};

/// Max number of output lines to include in command error messages.
const ERROR_TAIL_LINES: usize = 50;

/// Extract the useful tail of command output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `ERROR_TAIL_LINES`
/// lines so error messages are actionable without being overwhelming.
pub(crate) fn build_error_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

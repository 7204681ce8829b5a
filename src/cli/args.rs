//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rigger - build and deploy a project together with its dependencies
///
/// Resolves the projects declared in rigger.toml (recursively), then builds,
/// deploys or tears them down in dependency order.
#[derive(Parser, Debug)]
#[command(name = "rigger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long = "project", global = true)]
    pub project: Option<PathBuf>,

    /// Profile to activate in the project
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Tolerate cyclic dependencies
    #[arg(long, global = true)]
    pub allow_cyclic: bool,

    /// Settings file path
    #[arg(short, long, global = true, env = "RIGGER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build dependencies whose sources changed
    Build(BuildArgs),

    /// Build and deploy dependencies
    Deploy(DeployArgs),

    /// Refresh remote dependencies and recompute content hashes
    Update,

    /// Tear down deployed dependencies (dependents first)
    Purge(PurgeArgs),

    /// Show the resolved dependencies
    List(ListArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Rebuild even if sources are unchanged
    #[arg(short, long)]
    pub force: bool,

    /// Keep building unrelated dependencies after a failure
    #[arg(long)]
    pub continue_on_error: bool,

    /// Maximum parallel builds (default: from settings)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Arguments for the deploy command
#[derive(Parser, Debug)]
pub struct DeployArgs {
    /// Deploy without building first
    #[arg(long)]
    pub skip_build: bool,

    /// Rebuild even if sources are unchanged
    #[arg(long, conflicts_with = "skip_build")]
    pub force_build: bool,

    /// Redeploy even if already deployed
    #[arg(long)]
    pub force_deploy: bool,

    /// Keep deploying unrelated dependencies after a failure
    #[arg(long)]
    pub continue_on_error: bool,

    /// Maximum parallel deploys (default: from settings)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Arguments for the purge command
#[derive(Parser, Debug)]
pub struct PurgeArgs {
    /// Report purge failures as warnings instead of failing
    #[arg(long)]
    pub verbose_report: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

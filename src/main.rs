//! Rigger - dependency-aware build and deploy orchestrator
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use rigger::cli::{commands, Cli, Commands, ProjectContext};
use rigger::error::{RiggerError, RiggerResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RiggerResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("rigger=warn"),
        1 => EnvFilter::new("rigger=info"),
        _ => EnvFilter::new("rigger=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Dropping the operation on Ctrl-C kills running commands and skips the
    // checkpoint, leaving the last saved state on disk.
    tokio::select! {
        result = dispatch(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            debug!("Interrupted");
            Err(RiggerError::Cancelled)
        }
    }
}

async fn dispatch(cli: Cli) -> RiggerResult<()> {
    let project = ProjectContext::open(&cli).await?;

    match cli.command {
        Commands::Build(args) => commands::build(args, &project).await,
        Commands::Deploy(args) => commands::deploy(args, &project).await,
        Commands::Update => commands::update(&project).await,
        Commands::Purge(args) => commands::purge(args, &project).await,
        Commands::List(args) => commands::list(args, &project).await,
    }
}

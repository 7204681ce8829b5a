//! List command - show resolved dependencies

use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::ProjectContext;
use crate::dependency::Dependency;
use crate::error::RiggerResult;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::PathBuf;

/// Build state of a dependency relative to its stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    New,
    Changed,
    UpToDate,
}

/// One row of `rigger list`
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub id: String,
    pub name: Option<String>,
    pub path: PathBuf,
    pub profile: String,
    pub hash: String,
    pub state: BuildState,
    pub children: Vec<String>,
    pub skip_build: bool,
    pub skip_deploy: bool,
}

impl ListEntry {
    async fn from_dependency(dep: &Dependency) -> Self {
        let state = match dep.stored_hash().await {
            None => BuildState::New,
            Some(ref stored) if stored == &dep.hash => BuildState::UpToDate,
            Some(_) => BuildState::Changed,
        };

        Self {
            id: dep.id.to_string(),
            name: dep.name.clone(),
            path: dep.local_path.clone(),
            profile: dep.cache_profile().to_string(),
            hash: dep.hash.clone(),
            state,
            children: dep.children.iter().map(|c| c.to_string()).collect(),
            skip_build: dep.skip_build,
            skip_deploy: dep.skip_deploy,
        }
    }
}

/// Execute the list command
pub async fn execute(args: ListArgs, project: &ProjectContext) -> RiggerResult<()> {
    let resolution = project.manager.list().await?;
    let ctx = match args.format {
        OutputFormat::Table => UiContext::detect(),
        OutputFormat::Json | OutputFormat::Plain => UiContext::non_interactive(),
    };

    for failure in &resolution.failures {
        ui::step_warn(&ctx, &failure.to_string());
    }

    let mut entries = Vec::with_capacity(resolution.len());
    for dep in &resolution.dependencies {
        entries.push(ListEntry::from_dependency(dep).await);
    }

    if entries.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&ctx, "No dependencies declared"),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&ctx, &entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

fn print_table(ctx: &UiContext, entries: &[ListEntry]) {
    ui::intro(ctx, "Dependencies");

    println!(
        "{:<20} {:<12} {:<10} {:<40}",
        style("NAME").bold(),
        style("STATE").bold(),
        style("PROFILE").bold(),
        style("SOURCE").bold()
    );
    println!("{}", "-".repeat(82));

    for entry in entries {
        let state = match entry.state {
            BuildState::UpToDate => style("up to date").green(),
            BuildState::Changed => style("changed").yellow(),
            BuildState::New => style("new").cyan(),
        };
        let name = entry
            .name
            .clone()
            .or_else(|| {
                entry
                    .path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown".to_string());

        println!(
            "{:<20} {:<12} {:<10} {:<40}",
            name, state, entry.profile, entry.id
        );
    }

    println!();
    println!("{} dependencies", entries.len());
}

fn print_json(entries: &[ListEntry]) -> RiggerResult<()> {
    let json = serde_json::to_string_pretty(entries)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(entries: &[ListEntry]) {
    for entry in entries {
        println!("{}", entry.id);
    }
}

//! Build command - build changed dependencies

use crate::cli::args::BuildArgs;
use crate::cli::ProjectContext;
use crate::error::RiggerResult;
use crate::orchestration::BuildOptions;
use crate::ui::{TaskSpinner, UiContext};

/// Execute the build command
pub async fn execute(args: BuildArgs, project: &ProjectContext) -> RiggerResult<()> {
    let orchestration = &project.settings.orchestration;
    let options = BuildOptions {
        force_build: args.force,
        continue_on_error: args.continue_on_error || orchestration.continue_on_error,
        concurrency: args.jobs.unwrap_or(orchestration.concurrency),
    };

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Building dependencies...");

    match project.manager.build_all(&options).await {
        Ok(()) => {
            spinner.stop("Dependencies built");
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Build failed");
            Err(e)
        }
    }
}

//! Deploy command - build and deploy dependencies

use crate::cli::args::DeployArgs;
use crate::cli::ProjectContext;
use crate::error::RiggerResult;
use crate::orchestration::DeployOptions;
use crate::ui::{TaskSpinner, UiContext};

/// Execute the deploy command
pub async fn execute(args: DeployArgs, project: &ProjectContext) -> RiggerResult<()> {
    let orchestration = &project.settings.orchestration;
    let options = DeployOptions {
        skip_build: args.skip_build,
        force_build: args.force_build,
        force_deploy: args.force_deploy,
        continue_on_error: args.continue_on_error || orchestration.continue_on_error,
        concurrency: args.jobs.unwrap_or(orchestration.concurrency),
    };

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Deploying dependencies...");

    match project.manager.deploy_all(&options).await {
        Ok(()) => {
            spinner.stop("Dependencies deployed");
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Deploy failed");
            Err(e)
        }
    }
}

//! Purge command - tear down deployed dependencies

use crate::cli::args::PurgeArgs;
use crate::cli::ProjectContext;
use crate::error::RiggerResult;
use crate::ui::{TaskSpinner, UiContext};

/// Execute the purge command
pub async fn execute(args: PurgeArgs, project: &ProjectContext) -> RiggerResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Purging dependencies...");

    match project.manager.purge_all(args.verbose_report).await {
        Ok(()) => {
            spinner.stop("Dependencies purged");
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Purge incomplete");
            Err(e)
        }
    }
}

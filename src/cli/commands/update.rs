//! Update command - refresh remote dependencies

use crate::cli::ProjectContext;
use crate::error::RiggerResult;
use crate::ui::{TaskSpinner, UiContext};

/// Execute the update command
pub async fn execute(project: &ProjectContext) -> RiggerResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Updating dependencies...");

    match project.manager.update_all().await {
        Ok(()) => {
            spinner.stop("Dependencies updated");
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Update failed");
            Err(e)
        }
    }
}

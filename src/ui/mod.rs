//! Terminal output for the rigger CLI
//!
//! Styled step lines and a spinner in interactive terminals, with plain
//! `[OK]` / `[WARN]` style output in CI and when piped.
//!
//! ```rust,ignore
//! use rigger::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect();
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Building dependencies...");
//! // ... do work ...
//! spinner.stop("Dependencies built");
//! ui::step_warn(&ctx, "auth purge failed");
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{intro, step_info, step_warn};
pub use progress::TaskSpinner;

//! CLI command implementations

pub mod build;
pub mod deploy;
pub mod list;
pub mod purge;
pub mod update;

pub use build::execute as build;
pub use deploy::execute as deploy;
pub use list::execute as list;
pub use purge::execute as purge;
pub use update::execute as update;

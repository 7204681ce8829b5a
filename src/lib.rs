//! Rigger - dependency-aware build and deploy orchestrator
//!
//! Resolves a project's declared dependencies recursively, fingerprints
//! their source trees, and builds, deploys, updates or purges them in
//! dependency order while remembering what was already done.

pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod hash;
pub mod orchestration;
pub mod state;
pub mod ui;

pub use error::{RiggerError, RiggerResult};

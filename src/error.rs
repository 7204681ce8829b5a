//! Error types for Rigger
//!
//! All modules use `RiggerResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Rigger operations
pub type RiggerResult<T> = Result<T, RiggerError>;

/// All errors that can occur in Rigger
#[derive(Error, Debug)]
pub enum RiggerError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Profile '{profile}' not found in {path}")]
    ProfileNotFound { profile: String, path: PathBuf },

    // Resolution errors
    #[error("Failed to fetch dependency source {source_ref}: {reason}")]
    SourceFetch { source_ref: String, reason: String },

    #[error("Cyclic dependency detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("Dependency {dependency} could not be resolved: {reason}")]
    Unresolved { dependency: String, reason: String },

    // Orchestration errors
    #[error("Build failed for dependency {dependency}: {source}")]
    Build {
        dependency: String,
        #[source]
        source: Box<RiggerError>,
    },

    #[error("Deploy failed for dependency {dependency}: {source}")]
    Deploy {
        dependency: String,
        #[source]
        source: Box<RiggerError>,
    },

    #[error("Purge failed for dependency {dependency}: {source}")]
    Purge {
        dependency: String,
        #[source]
        source: Box<RiggerError>,
    },

    #[error("Dependency {dependency} skipped because {failed} failed")]
    Blocked { dependency: String, failed: String },

    #[error("{} dependencies failed:\n{}", .0.len(), format_errors(.0))]
    Multiple(Vec<RiggerError>),

    // State errors
    #[error("Generated state at {path} is corrupt: {reason}")]
    StateCorrupt { path: PathBuf, reason: String },

    // Hashing errors
    #[error("Invalid exclusion pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // General errors
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

fn format_errors(errors: &[RiggerError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl RiggerError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Collapse a list of failures into a single error.
    ///
    /// Returns `None` for an empty list and the error itself when there is
    /// exactly one.
    pub fn aggregate(mut errors: Vec<RiggerError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Dependency identity carried by an orchestration error
    pub fn dependency(&self) -> Option<&str> {
        match self {
            Self::Build { dependency, .. }
            | Self::Deploy { dependency, .. }
            | Self::Purge { dependency, .. }
            | Self::Blocked { dependency, .. }
            | Self::Unresolved { dependency, .. } => Some(dependency),
            _ => None,
        }
    }

    /// Check if this error is a disallowed dependency cycle
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Cycle { .. } => Some("Pass --allow-cyclic to tolerate cyclic dependencies"),
            Self::ConfigNotFound(_) => Some("Create a rigger.toml in the project directory"),
            Self::StateCorrupt { .. } => {
                Some("Remove the .rigger/generated.json file to reset cached state")
            }
            Self::SourceFetch { .. } => Some("Check the repository URL and your git credentials"),
            _ => None,
        }
    }
}

//! Error types for launching tools.

use crate::model::ToolMode;
use std::io;
use thiserror::Error;

/// Errors from starting a tool's program.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The binding has no program to run
    #[error("The {0} tool has no program")]
    MissingProgram(ToolMode),

    /// A script tool was requested but no script host is configured
    #[error("No script host is configured to run '{program}'")]
    NoScriptHost { program: String },

    /// The process could not be started
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

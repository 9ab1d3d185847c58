//! Starting the program of a resolved tool.

pub mod launch_error;
pub mod process_launcher;

pub use launch_error::LaunchError;
pub use process_launcher::ProcessLauncher;

use crate::model::ToolBinding;
use std::path::Path;

/// Starts a tool's program on a file.
pub trait ToolLauncher {
    /// Start `binding`'s program with `target` as its argument.
    ///
    /// Failures are reported, never retried.
    fn launch(&self, binding: &ToolBinding, target: &Path) -> Result<(), LaunchError>;
}

use super::{LaunchError, ToolLauncher};
use crate::model::{LaunchType, ToolBinding};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// Launches tools as child processes.
///
/// Children are spawned and left running; the launcher does not wait for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessLauncher {
    script_host: Option<String>,
}

impl ProcessLauncher {
    /// A launcher without a script host. Script tools fail to launch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `host` to run script tools.
    pub fn with_script_host(mut self, host: impl Into<String>) -> Self {
        self.script_host = Some(host.into());
        self
    }

    pub fn script_host(&self) -> Option<&str> {
        self.script_host.as_deref()
    }

    /// The command that would start `binding` on `target`.
    ///
    /// - [`LaunchType::Shell`]: the program line runs through the platform shell,
    ///   with `target` passed as a separate argument.
    /// - [`LaunchType::DesktopLaunch`]: the program runs directly.
    /// - [`LaunchType::ScriptLaunch`]: the script host runs the program.
    ///
    /// Unknown launch types are treated as [`LaunchType::DesktopLaunch`].
    /// On Unix the stored program bytes reach the process unchanged.
    pub fn command(&self, binding: &ToolBinding, target: &Path) -> Result<Command, LaunchError> {
        let program = binding
            .usable_program()
            .ok_or(LaunchError::MissingProgram(binding.mode))?;

        let launch_type = binding.flags.launch_type().unwrap_or_else(|| {
            trace!(flags = binding.flags.bits(), "unknown launch type, launching directly");
            LaunchType::DesktopLaunch
        });

        let command = match launch_type {
            LaunchType::Shell => shell_command(program, target),
            LaunchType::DesktopLaunch => {
                let mut command = Command::new(os_string(program.to_vec()));
                command.arg(target);
                command
            }
            LaunchType::ScriptLaunch => {
                let host = self.script_host.as_deref().ok_or_else(|| LaunchError::NoScriptHost {
                    program: binding.program_display().into_owned(),
                })?;
                let mut command = Command::new(host);
                command.arg(os_string(program.to_vec())).arg(target);
                command
            }
        };
        Ok(command)
    }
}

#[cfg(unix)]
fn os_string(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn os_string(bytes: Vec<u8>) -> OsString {
    // Without a byte-based OS string the name has to be text.
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(not(windows))]
fn shell_command(program: &[u8], target: &Path) -> Command {
    // `$0` names the script; `$1` is the target, kept out of the command line to avoid quoting.
    let mut line = program.to_vec();
    line.extend_from_slice(b" \"$1\"");

    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(os_string(line))
        .arg("datatype")
        .arg(target);
    command
}

#[cfg(windows)]
fn shell_command(program: &[u8], target: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(os_string(program.to_vec())).arg(target);
    command
}

impl ToolLauncher for ProcessLauncher {
    fn launch(&self, binding: &ToolBinding, target: &Path) -> Result<(), LaunchError> {
        let mut command = self.command(binding, target)?;
        debug!(?command, "launching tool");

        command
            .spawn()
            .map(|_child| ())
            .map_err(|source| LaunchError::Spawn {
                program: binding.program_display().into_owned(),
                source,
            })
    }
}

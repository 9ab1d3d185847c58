//! Describing a file's datatype and running its tools.

use crate::error::CliError;
use datatype_query_api::{DatatypeDescriptor, ToolLauncher, ToolMode, ToolResolver};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// `<file>: <Group>/<base name>`, plus ` (<name>)` when the display name differs.
pub fn describe(file: &Path, descriptor: &DatatypeDescriptor) -> String {
    let mut line = format!(
        "{}: {}/{}",
        file.display(),
        descriptor.group,
        descriptor.base_name
    );
    if descriptor.name != descriptor.base_name {
        line.push_str(&format!(" ({})", descriptor.name));
    }
    line
}

/// Write `  <MODE>: <program>` for every mode with a tool bound to exactly that mode.
pub fn list_tools(
    resolver: &ToolResolver,
    descriptor: &DatatypeDescriptor,
    out: &mut impl Write,
) -> Result<(), CliError> {
    for &mode in ToolMode::all_values().iter() {
        if let Some(resolution) = resolver.resolve_exact(descriptor, mode) {
            writeln!(out, "  {mode}: {}", resolution.binding.program_display())?;
        }
    }
    Ok(())
}

/// Resolve the tool for `mode` through every stage and launch it on `file`.
pub fn launch_tool(
    resolver: &ToolResolver,
    launcher: &impl ToolLauncher,
    descriptor: &DatatypeDescriptor,
    mode: ToolMode,
    file: &Path,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let resolution = resolver
        .resolve_with_stage(descriptor, mode)
        .ok_or(CliError::NoTool(mode))?;
    debug!(%mode, stage = %resolution.stage, "tool chosen");

    writeln!(out, "Launching tool: {}", resolution.binding.program_display())?;
    out.flush()?;

    launcher.launch(&resolution.binding, file)?;
    Ok(())
}

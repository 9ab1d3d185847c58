//! Resolving the tool to run for a datatype and mode.
//!
//! Resolution tries the stages of [`ResolveStage::ESCALATION`] in order and stops
//! at the first [`StageOutcome::Matched`]:
//!
//! 1. [`ResolveStage::Registry`]: the datatype's in-memory tool list, exact mode.
//! 2. [`ResolveStage::DescriptorFile`]: the datatype's descriptor file on disk, exact mode.
//! 3. [`ResolveStage::AnyAvailable`]: the first in-memory tool with a program, any mode.
//!
//! Errors inside a stage never abort resolution. They are logged and the next
//! stage runs.

pub mod stage;

pub use stage::{ResolveStage, StageOutcome};

use crate::descriptor_file::{find_tool_in_descriptor_file, DescriptorLocator};
use crate::model::{DatatypeDescriptor, ToolBinding, ToolMode};
use tracing::debug;

/// A resolved tool and the stage that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub stage: ResolveStage,
    pub binding: ToolBinding,
}

/// Finds the tool for a datatype and mode, escalating through [`ResolveStage`]s.
#[derive(Debug, Clone)]
pub struct ToolResolver {
    locator: DescriptorLocator,
}

impl ToolResolver {
    /// A resolver that looks for descriptor files with `locator`.
    pub fn new(locator: DescriptorLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &DescriptorLocator {
        &self.locator
    }

    /// The tool to run for `mode`, through every stage.
    ///
    /// Returns [`None`] if no stage finds a tool.
    pub fn resolve(&self, descriptor: &DatatypeDescriptor, mode: ToolMode) -> Option<ToolBinding> {
        self.resolve_with_stage(descriptor, mode)
            .map(|resolution| resolution.binding)
    }

    /// Like [`resolve`](Self::resolve), also reporting which stage matched.
    pub fn resolve_with_stage(
        &self,
        descriptor: &DatatypeDescriptor,
        mode: ToolMode,
    ) -> Option<Resolution> {
        self.resolve_through(&ResolveStage::ESCALATION, descriptor, mode)
    }

    /// A tool bound to exactly `mode`, skipping the any-mode fallback.
    pub fn resolve_exact(
        &self,
        descriptor: &DatatypeDescriptor,
        mode: ToolMode,
    ) -> Option<Resolution> {
        self.resolve_through(&ResolveStage::EXACT, descriptor, mode)
    }

    /// Run `stages` in order, returning the first match.
    pub fn resolve_through(
        &self,
        stages: &[ResolveStage],
        descriptor: &DatatypeDescriptor,
        mode: ToolMode,
    ) -> Option<Resolution> {
        stages.iter().find_map(|&stage| match self.run_stage(stage, descriptor, mode) {
            StageOutcome::Matched(binding) => {
                debug!(
                    base_name = %descriptor.base_name,
                    %mode,
                    %stage,
                    program = %binding.program_display(),
                    "resolved tool"
                );
                Some(Resolution { stage, binding })
            }
            StageOutcome::Continue => None,
        })
    }

    /// Run a single stage.
    pub fn run_stage(
        &self,
        stage: ResolveStage,
        descriptor: &DatatypeDescriptor,
        mode: ToolMode,
    ) -> StageOutcome {
        let found = match stage {
            ResolveStage::Registry => descriptor.find_tool(mode).cloned(),
            ResolveStage::DescriptorFile => self.scan_descriptor_file(descriptor, mode),
            ResolveStage::AnyAvailable => descriptor.first_available_tool().cloned(),
        };

        match found {
            Some(binding) => StageOutcome::Matched(binding),
            None => {
                debug!(base_name = %descriptor.base_name, %mode, %stage, "no tool in stage");
                StageOutcome::Continue
            }
        }
    }

    fn scan_descriptor_file(
        &self,
        descriptor: &DatatypeDescriptor,
        mode: ToolMode,
    ) -> Option<ToolBinding> {
        let Some(path) = self.locator.locate(&descriptor.base_name) else {
            debug!(
                base_name = %descriptor.base_name,
                directory = %self.locator.directory().display(),
                "no descriptor file"
            );
            return None;
        };

        match find_tool_in_descriptor_file(&path, mode) {
            Ok(found) => found,
            Err(error) => {
                debug!(path = %path.display(), %error, "descriptor file scan failed");
                None
            }
        }
    }
}

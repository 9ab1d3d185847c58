//! Escalation stages of tool resolution.

use crate::model::ToolBinding;
use core::fmt;

/// One strategy for finding a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveStage {
    /// Exact mode match in the datatype's in-memory tool list
    Registry,
    /// Exact mode match in the datatype's descriptor file
    DescriptorFile,
    /// Any tool with a program in the in-memory list, whatever its mode
    AnyAvailable,
}

impl ResolveStage {
    /// Every stage, in the order they are tried.
    pub const ESCALATION: [ResolveStage; 3] = [
        ResolveStage::Registry,
        ResolveStage::DescriptorFile,
        ResolveStage::AnyAvailable,
    ];

    /// Stages that only return tools bound to the requested mode.
    pub const EXACT: [ResolveStage; 2] = [ResolveStage::Registry, ResolveStage::DescriptorFile];

    /// Whether a match from this stage is bound to the requested mode.
    pub const fn is_exact(self) -> bool {
        !matches!(self, ResolveStage::AnyAvailable)
    }
}

impl fmt::Display for ResolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Registry => "registry",
            Self::DescriptorFile => "descriptor file",
            Self::AnyAvailable => "any available",
        })
    }
}

/// Result of running a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage found a tool; escalation stops.
    Matched(ToolBinding),
    /// Nothing found, or the stage failed; try the next one.
    Continue,
}

#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]

// Core modules
pub mod descriptor_file;
pub mod launch;
pub mod model;
pub mod registry;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_prelude;

// Re-export key types
pub use descriptor_file::{DescriptorFileError, DescriptorLocator};
pub use launch::{LaunchError, ProcessLauncher, ToolLauncher};
pub use model::{DatatypeDescriptor, GroupId, LaunchType, ToolBinding, ToolFlags, ToolMode};
pub use registry::{DatatypeRegistry, DescriptorRegistry, RegistryError};
pub use resolve::{Resolution, ResolveStage, StageOutcome, ToolResolver};

//! Datatypes and the tools bound to them.

pub mod descriptor;
pub mod group;
pub mod tool_binding;
pub mod tool_mode;

pub use descriptor::DatatypeDescriptor;
pub use group::GroupId;
pub use tool_binding::{LaunchType, ToolBinding, ToolFlags};
pub use tool_mode::{ParseToolModeError, ToolMode};

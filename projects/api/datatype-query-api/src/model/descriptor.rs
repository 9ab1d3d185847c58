use super::{GroupId, ToolBinding, ToolMode};

/// A classified file type, as returned by a [`DatatypeRegistry`].
///
/// The tool list is the registry's in-memory view. It may be empty or stale;
/// resolution falls back to the type's descriptor file when it is.
///
/// [`DatatypeRegistry`]: crate::registry::DatatypeRegistry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatatypeDescriptor {
    pub group: GroupId,
    /// Short machine name, also used to locate the descriptor file.
    pub base_name: String,
    /// Display name.
    pub name: String,
    pub tools: Vec<ToolBinding>,
}

impl DatatypeDescriptor {
    /// A descriptor with an empty tool list.
    pub fn new(group: GroupId, base_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group,
            base_name: base_name.into(),
            name: name.into(),
            tools: Vec::new(),
        }
    }

    /// Replace the tool list.
    pub fn with_tools(mut self, tools: Vec<ToolBinding>) -> Self {
        self.tools = tools;
        self
    }

    /// First tool in list order bound to exactly `mode` with a usable program.
    pub fn find_tool(&self, mode: ToolMode) -> Option<&ToolBinding> {
        self.tools
            .iter()
            .find(|tool| tool.mode == mode && tool.is_usable())
    }

    /// First tool in list order with a usable program, whatever its mode.
    pub fn first_available_tool(&self) -> Option<&ToolBinding> {
        self.tools.iter().find(|tool| tool.is_usable())
    }
}

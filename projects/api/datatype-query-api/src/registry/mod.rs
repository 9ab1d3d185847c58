//! Classifying files into datatypes.

pub mod descriptor_registry;
pub mod pattern;
pub mod registry_error;

pub use descriptor_registry::DescriptorRegistry;
pub use pattern::{Pattern, PatternError};
pub use registry_error::RegistryError;

use crate::model::DatatypeDescriptor;
use std::path::Path;

/// A source of datatype classifications.
///
/// Implementations return an owned descriptor per query; callers drop it once
/// the query is done.
pub trait DatatypeRegistry {
    /// Classify the file at `path`.
    fn obtain(&self, path: &Path) -> Result<DatatypeDescriptor, RegistryError>;
}

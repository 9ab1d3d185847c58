//! Error types for registry operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading a registry or classifying a file.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The descriptor directory could not be listed
    #[error("Cannot read descriptor directory {}: {source}", .path.display())]
    DescriptorDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file to classify could not be opened or read
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path exists but is not a regular file
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),
}

//! Error types for chunk reading.

use crate::ChunkId;
use std::io;
use thiserror::Error;

/// Result type for chunk reader operations
pub type ChunkResult<T> = Result<T, ChunkError>;

/// Errors produced while walking an IFF container.
///
/// After any of these the reader's position inside the container is unknown,
/// so callers should stop scanning rather than retry.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The underlying stream failed
    #[error("I/O error while reading chunks: {0}")]
    Io(#[from] io::Error),

    /// The stream ended in the middle of a header or payload
    #[error("Stream ended before the container was complete")]
    Truncated,

    /// The stream does not start with a `FORM` header
    #[error("Stream is not an IFF container (found '{found}')")]
    NotAContainer { found: ChunkId },

    /// The container is a `FORM`, but of a different type than requested
    #[error("Container type is '{found}', expected '{expected}'")]
    ContainerMismatch { expected: ChunkId, found: ChunkId },

    /// The `FORM` header declares a size too small to hold its own type
    #[error("Container declares an invalid size of {0} bytes")]
    InvalidContainerSize(u32),

    /// A chunk claims more bytes than are left in its container
    #[error("Chunk '{id}' declares {size} bytes but only {remaining} remain in the container")]
    ChunkOverrunsContainer {
        id: ChunkId,
        size: u32,
        remaining: u32,
    },

    /// Bytes were left at the end of the container that cannot hold a chunk header
    #[error("{0} trailing bytes at the end of the container")]
    TrailingBytes(u32),

    /// [`advance`] was called while a stop chunk was still current
    ///
    /// [`advance`]: crate::ChunkReader::advance
    #[error("Current chunk '{0}' must be popped before advancing")]
    ChunkNotPopped(ChunkId),

    /// A chunk operation was attempted with no current chunk
    #[error("No chunk is currently selected")]
    NoCurrentChunk,

    /// More bytes were requested than remain in the current chunk
    #[error("Requested {requested} bytes but the chunk only has {available} left")]
    ShortRead { requested: usize, available: usize },
}

/// Maps an unexpected end of stream onto [`ChunkError::Truncated`].
pub(crate) fn map_eof(error: io::Error) -> ChunkError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        ChunkError::Truncated
    } else {
        ChunkError::Io(error)
    }
}

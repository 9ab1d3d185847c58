//! Error types for descriptor file decoding.

use datatype_query_iff::{ChunkError, ChunkId};
use std::io;
use thiserror::Error;

/// Why a tool record (`DTTL` payload) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolRecordError {
    /// Payload is empty or reaches the size ceiling
    #[error("Tool record of {0} bytes is outside the accepted size range")]
    PayloadSize(usize),

    /// Payload cannot hold the fixed prefix
    #[error("Tool record of {0} bytes is too short for its 8 byte prefix")]
    TooShort(usize),

    /// Mode code is 0 or above 5
    #[error("Unknown tool mode code {0}")]
    UnknownMode(u16),

    /// Program offset is 0 or points past the payload
    #[error("Program offset {offset} is outside the {len} byte record")]
    ProgramOffsetOutOfBounds { offset: u32, len: usize },

    /// The program string is empty
    #[error("Tool record has an empty program name")]
    EmptyProgram,
}

/// Why a descriptor header (`DTHD` payload) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Payload cannot hold the fixed prefix
    #[error("Header of {0} bytes is too short for its 32 byte prefix")]
    TooShort(usize),

    /// Payload exceeds the header size ceiling
    #[error("Header of {0} bytes exceeds the size limit")]
    TooLarge(usize),

    /// A required string is missing or its offset points past the payload
    #[error("Header field '{field}' has invalid offset {offset} in a {len} byte header")]
    StringOutOfBounds {
        field: &'static str,
        offset: u32,
        len: usize,
    },

    /// A required string is empty
    #[error("Header field '{0}' is empty")]
    EmptyString(&'static str),

    /// Mask length field is negative
    #[error("Header declares a negative mask length ({0})")]
    NegativeMaskLength(i16),

    /// Mask words run past the payload
    #[error("Mask of {words} words at offset {offset} does not fit a {len} byte header")]
    MaskOutOfBounds { offset: u32, words: usize, len: usize },
}

/// Errors while reading a descriptor file.
#[derive(Debug, Error)]
pub enum DescriptorFileError {
    /// The file could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a well formed `FORM DTYP`
    #[error("Chunk error: {0}")]
    Chunk(#[from] ChunkError),

    /// The first stop chunk was not the header. `None` means the container was empty.
    #[error("Descriptor file has no leading DTHD chunk (found {found:?})")]
    MissingHeader { found: Option<ChunkId> },

    /// The header chunk could not be decoded
    #[error("Invalid descriptor header: {0}")]
    Header(#[from] HeaderError),
}

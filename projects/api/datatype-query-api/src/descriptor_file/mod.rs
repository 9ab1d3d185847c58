//! On-disk datatype descriptor files.
//!
//! A descriptor file is an IFF `FORM` of type `DTYP`:
//!
//! ```text
//! FORM <size> DTYP
//!     DTHD <size> <header>        exactly one, first
//!     DTTL <size> <tool record>   zero or more
//!     ...                         other chunks (NAME, DTCD, ...) are skipped
//! ```
//!
//! All integers are big-endian. String fields are NUL-terminated and addressed by
//! offsets relative to the start of the chunk payload that holds them.

pub mod error;
pub mod header;
pub mod locator;
pub mod scan;
pub mod tool_record;

pub use error::{DescriptorFileError, HeaderError, ToolRecordError};
pub use header::{DescriptorHeader, FileKind, HeaderFlags};
pub use locator::DescriptorLocator;
pub use scan::{
    find_tool_in_descriptor_file, read_descriptor, read_descriptor_file, scan_tool_chunks,
    DescriptorFile,
};
pub use tool_record::{decode_tool_record, is_valid_tool_chunk_size, parse_tool_record};

use datatype_query_iff::ChunkId;

/// Container type of a descriptor file.
pub const ID_DTYP: ChunkId = ChunkId::from_bytes(*b"DTYP");
/// Descriptor header chunk.
pub const ID_DTHD: ChunkId = ChunkId::from_bytes(*b"DTHD");
/// Tool binding chunk.
pub const ID_DTTL: ChunkId = ChunkId::from_bytes(*b"DTTL");

/// Bytes of the NUL-terminated string starting at `offset`.
///
/// The string ends at the first NUL or at the end of `payload`.
/// Returns [`None`] if `offset` is not inside `payload`.
pub(crate) fn c_string_at(payload: &[u8], offset: usize) -> Option<&[u8]> {
    let tail = payload.get(offset..).filter(|tail| !tail.is_empty())?;
    let end = tail.iter().position(|&byte| byte == 0).unwrap_or(tail.len());
    Some(&tail[..end])
}

/// Decode stored text: UTF-8 when valid, ISO-8859-1 otherwise.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    match core::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        // Every Latin-1 byte maps to the code point of the same value.
        Err(_) => bytes.iter().map(|&byte| byte as char).collect(),
    }
}

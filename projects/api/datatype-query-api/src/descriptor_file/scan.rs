//! Walking descriptor files for their header and tool records.

use super::header::MAX_HEADER_CHUNK_SIZE;
use super::tool_record::{decode_tool_record, is_valid_tool_chunk_size, parse_tool_record};
use super::{DescriptorFileError, DescriptorHeader, HeaderError, ID_DTHD, ID_DTTL, ID_DTYP};
use crate::model::{DatatypeDescriptor, ToolBinding, ToolMode};
use datatype_query_iff::{ChunkInfo, ChunkReader};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

/// A fully decoded descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorFile {
    pub header: DescriptorHeader,
    /// Every well formed tool record, in file order.
    pub tools: Vec<ToolBinding>,
}

impl DescriptorFile {
    /// The datatype described by this file, with its tool list.
    pub fn to_descriptor(&self) -> DatatypeDescriptor {
        DatatypeDescriptor::new(
            self.header.group,
            self.header.base_name.clone(),
            self.header.name.clone(),
        )
        .with_tools(self.tools.clone())
    }
}

/// Look for a tool bound to exactly `mode` in the descriptor file at `path`.
///
/// See [`scan_tool_chunks`].
pub fn find_tool_in_descriptor_file(
    path: &Path,
    mode: ToolMode,
) -> Result<Option<ToolBinding>, DescriptorFileError> {
    let file = File::open(path)?;
    scan_tool_chunks(BufReader::new(file), mode)
}

/// Look for a tool bound to exactly `mode` in a descriptor file stream.
///
/// The leading `DTHD` chunk is skipped without being decoded. `DTTL` chunks are
/// then decoded in order until one binds `mode`. Tool chunks of invalid size and
/// malformed or non-matching records are skipped. Scanning ends at the first stop
/// chunk that is not a `DTTL`.
///
/// # Returns
///
/// - `Ok(Some(binding))` for the first matching record.
/// - `Ok(None)` if no record binds `mode`.
///
/// # Errors
///
/// - [`DescriptorFileError::MissingHeader`] if the first stop chunk is not `DTHD`.
/// - I/O and framing errors from the underlying [`ChunkReader`].
pub fn scan_tool_chunks<R: Read>(
    reader: R,
    mode: ToolMode,
) -> Result<Option<ToolBinding>, DescriptorFileError> {
    let mut chunks = ChunkReader::new(reader);
    enter_header(&mut chunks)?;
    chunks.pop_chunk()?;

    chunks.stop_at(ID_DTYP, ID_DTTL)?;
    while let Some(chunk) = chunks.advance()? {
        if chunk.id != ID_DTTL {
            trace!(chunk = %chunk.id, "stop chunk after the tool records");
            break;
        }
        let payload = read_tool_payload(&mut chunks, chunk)?;
        chunks.pop_chunk()?;
        if let Some(binding) = payload.and_then(|payload| decode_tool_record(&payload, mode)) {
            return Ok(Some(binding));
        }
    }

    Ok(None)
}

/// Read the descriptor file at `path` completely.
///
/// See [`read_descriptor`].
pub fn read_descriptor_file(path: &Path) -> Result<DescriptorFile, DescriptorFileError> {
    let file = File::open(path)?;
    read_descriptor(BufReader::new(file))
}

/// Decode the header and every tool record of a descriptor file stream.
///
/// Unlike [`scan_tool_chunks`], the header must decode. Malformed tool records
/// are skipped; records of every mode are kept.
pub fn read_descriptor<R: Read>(reader: R) -> Result<DescriptorFile, DescriptorFileError> {
    let mut chunks = ChunkReader::new(reader);
    let header_chunk = enter_header(&mut chunks)?;
    if header_chunk.size > MAX_HEADER_CHUNK_SIZE {
        return Err(HeaderError::TooLarge(header_chunk.size as usize).into());
    }
    let payload = chunks.read_bytes(header_chunk.size as usize)?;
    chunks.pop_chunk()?;
    let header = DescriptorHeader::parse(&payload)?;

    let mut tools = Vec::new();
    chunks.stop_at(ID_DTYP, ID_DTTL)?;
    while let Some(chunk) = chunks.advance()? {
        if chunk.id != ID_DTTL {
            break;
        }
        let Some(payload) = read_tool_payload(&mut chunks, chunk)? else {
            chunks.pop_chunk()?;
            continue;
        };
        chunks.pop_chunk()?;
        match parse_tool_record(&payload) {
            Ok(binding) => tools.push(binding),
            Err(error) => trace!(base_name = %header.base_name, %error, "skipping tool record"),
        }
    }

    Ok(DescriptorFile { header, tools })
}

/// Read the payload of the current `DTTL` chunk.
///
/// Returns `None` for chunks of invalid size, leaving their payload unread.
fn read_tool_payload<R: Read>(
    chunks: &mut ChunkReader<R>,
    chunk: ChunkInfo,
) -> Result<Option<Vec<u8>>, DescriptorFileError> {
    if !is_valid_tool_chunk_size(chunk.size) {
        trace!(size = chunk.size, "skipping tool chunk of invalid size");
        return Ok(None);
    }
    Ok(Some(chunks.read_bytes(chunk.size as usize)?))
}

/// Open the container and stop at its leading `DTHD` chunk.
///
/// The `DTHD` stop point stays registered afterwards.
fn enter_header<R: Read>(
    chunks: &mut ChunkReader<R>,
) -> Result<ChunkInfo, DescriptorFileError> {
    chunks.stop_at(ID_DTYP, ID_DTHD)?;
    match chunks.advance()? {
        Some(chunk) if chunk.id == ID_DTHD => Ok(chunk),
        other => Err(DescriptorFileError::MissingHeader {
            found: other.map(|chunk| chunk.id),
        }),
    }
}

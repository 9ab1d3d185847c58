//! Decoding of tool binding records (`DTTL` chunk payloads).
//!
//! # Layout
//!
//! | Offset | Width | Field                                      |
//! |--------|-------|--------------------------------------------|
//! | 0      | 2     | Mode code                                  |
//! | 2      | 2     | Flags (bits 0-3: launch type)              |
//! | 4      | 4     | Offset of the program name in this payload |
//! | 8      | ..    | String data                                |
//!
//! The program name is NUL-terminated; a missing NUL ends it at the payload end.
//! Its bytes are kept as stored, without any text decoding.

use super::{c_string_at, ToolRecordError};
use crate::model::{ToolBinding, ToolFlags, ToolMode};
use tracing::trace;

/// Payloads of this many bytes or more are never decoded.
pub const MAX_TOOL_CHUNK_SIZE: u32 = 1000;

/// Size of the fixed prefix before the string data.
pub const TOOL_RECORD_PREFIX_SIZE: usize = 8;

/// One big-endian field of the fixed record prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordField {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl RecordField {
    /// Read this field from `payload`, or [`None`] if it does not fit.
    pub fn read(&self, payload: &[u8]) -> Option<u32> {
        let bytes = payload.get(self.offset..self.offset + self.width)?;
        Some(bytes.iter().fold(0u32, |value, &byte| (value << 8) | u32::from(byte)))
    }
}

/// Mode code field.
pub const FIELD_MODE: RecordField = RecordField {
    name: "mode",
    offset: 0,
    width: 2,
};
/// Flags field.
pub const FIELD_FLAGS: RecordField = RecordField {
    name: "flags",
    offset: 2,
    width: 2,
};
/// Program name offset field.
pub const FIELD_PROGRAM_OFFSET: RecordField = RecordField {
    name: "program_offset",
    offset: 4,
    width: 4,
};

/// The decoded fixed prefix of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolRecordPrefix {
    /// Raw mode code, not validated.
    pub mode_code: u16,
    pub flags: ToolFlags,
    pub program_offset: u32,
}

/// Whether a `DTTL` chunk of `size` bytes may be read and decoded.
///
/// Checked against the chunk header before any payload is read.
#[inline]
pub fn is_valid_tool_chunk_size(size: u32) -> bool {
    size > 0 && size < MAX_TOOL_CHUNK_SIZE
}

/// Decode the fixed 8 byte prefix.
pub fn parse_tool_prefix(payload: &[u8]) -> Result<ToolRecordPrefix, ToolRecordError> {
    let len = payload.len();
    if u32::try_from(len).map_or(true, |size| !is_valid_tool_chunk_size(size)) {
        return Err(ToolRecordError::PayloadSize(len));
    }

    let (Some(mode_code), Some(flags), Some(program_offset)) = (
        FIELD_MODE.read(payload),
        FIELD_FLAGS.read(payload),
        FIELD_PROGRAM_OFFSET.read(payload),
    ) else {
        return Err(ToolRecordError::TooShort(len));
    };

    Ok(ToolRecordPrefix {
        mode_code: mode_code as u16,
        flags: ToolFlags::from_bits(flags as u16),
        program_offset,
    })
}

/// Decode a complete record, reporting why it was rejected.
pub fn parse_tool_record(payload: &[u8]) -> Result<ToolBinding, ToolRecordError> {
    let prefix = parse_tool_prefix(payload)?;
    let mode = ToolMode::from_code(prefix.mode_code)
        .ok_or(ToolRecordError::UnknownMode(prefix.mode_code))?;
    let program = read_program(payload, prefix.program_offset)?;

    Ok(ToolBinding {
        mode,
        flags: prefix.flags,
        program: Some(program),
    })
}

/// Decode a record if it binds exactly `want`.
///
/// Returns [`None`] for records of another mode and for malformed records.
/// The program offset is only validated for records of the wanted mode.
pub fn decode_tool_record(payload: &[u8], want: ToolMode) -> Option<ToolBinding> {
    let prefix = match parse_tool_prefix(payload) {
        Ok(prefix) => prefix,
        Err(error) => {
            trace!(%error, "rejected tool record");
            return None;
        }
    };

    if prefix.mode_code != want.code() {
        trace!(mode_code = prefix.mode_code, want = %want, "tool record has another mode");
        return None;
    }

    match read_program(payload, prefix.program_offset) {
        Ok(program) => Some(ToolBinding {
            mode: want,
            flags: prefix.flags,
            program: Some(program),
        }),
        Err(error) => {
            trace!(%error, want = %want, "rejected tool record");
            None
        }
    }
}

fn read_program(payload: &[u8], offset: u32) -> Result<Vec<u8>, ToolRecordError> {
    let out_of_bounds = ToolRecordError::ProgramOffsetOutOfBounds {
        offset,
        len: payload.len(),
    };
    if offset == 0 {
        return Err(out_of_bounds);
    }

    let bytes = c_string_at(payload, offset as usize).ok_or(out_of_bounds)?;
    if bytes.is_empty() {
        return Err(ToolRecordError::EmptyProgram);
    }
    Ok(bytes.to_vec())
}

//! Common test imports and utilities for datatype query tests
//!
//! Provides builders for descriptor file payloads so tests can describe
//! fixtures by field instead of by byte.
#![allow(unused_imports)]

pub use crate::descriptor_file::{ID_DTHD, ID_DTTL, ID_DTYP};
pub use datatype_query_iff::FormBuilder;
pub use rstest::rstest;
pub use std::io::Cursor;
pub use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A tool record with the program stored right after the prefix.
pub fn tool_record(mode_code: u16, flags: u16, program: &str) -> Vec<u8> {
    let mut tail = program.as_bytes().to_vec();
    tail.push(0);
    raw_tool_record(mode_code, flags, 8, &tail)
}

/// A tool record with an arbitrary program offset and string data.
pub fn raw_tool_record(mode_code: u16, flags: u16, offset: u32, tail: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(8 + tail.len());
    record.extend_from_slice(&mode_code.to_be_bytes());
    record.extend_from_slice(&flags.to_be_bytes());
    record.extend_from_slice(&offset.to_be_bytes());
    record.extend_from_slice(tail);
    record
}

/// Field-by-field description of a `DTHD` payload.
#[derive(Debug, Clone)]
pub struct HeaderFixture {
    name: String,
    base_name: String,
    pattern: Option<String>,
    mask: Vec<u16>,
    group: [u8; 4],
    type_id: [u8; 4],
    flags: u16,
    priority: u16,
}

impl HeaderFixture {
    pub fn new(name: &str, base_name: &str) -> Self {
        Self {
            name: name.to_owned(),
            base_name: base_name.to_owned(),
            pattern: None,
            mask: Vec::new(),
            group: *b"syst",
            type_id: *b"????",
            flags: 0,
            priority: 0,
        }
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_owned());
        self
    }

    pub fn mask(mut self, mask: &[u16]) -> Self {
        self.mask = mask.to_vec();
        self
    }

    pub fn group(mut self, group: [u8; 4]) -> Self {
        self.group = group;
        self
    }

    pub fn type_id(mut self, type_id: [u8; 4]) -> Self {
        self.type_id = type_id;
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut strings = Vec::new();
        let mut push_string = |value: &str| {
            let offset = 32 + strings.len() as u32;
            strings.extend_from_slice(value.as_bytes());
            strings.push(0);
            offset
        };

        let name_offset = push_string(&self.name);
        let base_offset = push_string(&self.base_name);
        let pattern_offset = self.pattern.as_deref().map_or(0, &mut push_string);
        if strings.len() % 2 == 1 {
            strings.push(0);
        }

        let mask_offset = if self.mask.is_empty() {
            0
        } else {
            32 + strings.len() as u32
        };
        for word in &self.mask {
            strings.extend_from_slice(&word.to_be_bytes());
        }

        let mut payload = Vec::with_capacity(32 + strings.len());
        payload.extend_from_slice(&name_offset.to_be_bytes());
        payload.extend_from_slice(&base_offset.to_be_bytes());
        payload.extend_from_slice(&pattern_offset.to_be_bytes());
        payload.extend_from_slice(&mask_offset.to_be_bytes());
        payload.extend_from_slice(&self.group);
        payload.extend_from_slice(&self.type_id);
        payload.extend_from_slice(&(self.mask.len() as i16).to_be_bytes());
        payload.extend_from_slice(&0u16.to_be_bytes());
        payload.extend_from_slice(&self.flags.to_be_bytes());
        payload.extend_from_slice(&self.priority.to_be_bytes());
        payload.extend_from_slice(&strings);
        payload
    }
}

/// A complete descriptor file: header chunk followed by tool chunks.
pub fn descriptor_file_bytes(header: &[u8], tools: &[Vec<u8>]) -> Vec<u8> {
    let mut builder = FormBuilder::new(ID_DTYP).chunk(ID_DTHD, header.to_vec());
    for tool in tools {
        builder.push_chunk(ID_DTTL, tool.clone());
    }
    builder.build()
}

/// Write `contents` to `dir/name`, returning the path.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

//! Common test imports and utilities for chunk reader tests
#![allow(unused_imports)]

pub use crate::builder::FormBuilder;
pub use crate::{ChunkError, ChunkId, ChunkInfo, ChunkReader, ID_FORM};
pub use rstest::rstest;
pub use std::io::{Cursor, Read};

pub const ID_TEST: ChunkId = ChunkId::from_bytes(*b"TEST");
pub const ID_HEAD: ChunkId = ChunkId::from_bytes(*b"HEAD");
pub const ID_BODY: ChunkId = ChunkId::from_bytes(*b"BODY");
pub const ID_NOTE: ChunkId = ChunkId::from_bytes(*b"NOTE");

/// Reader over an in-memory file.
pub fn reader_for(data: Vec<u8>) -> ChunkReader<Cursor<Vec<u8>>> {
    ChunkReader::new(Cursor::new(data))
}

/// Hand-assembled `FORM` with an arbitrary size field, for malformed inputs
/// [`FormBuilder`] will not produce.
pub fn raw_form(size: u32, form_type: ChunkId, body: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(12 + body.len());
    data.extend_from_slice(&ID_FORM.to_bytes());
    data.extend_from_slice(&size.to_be_bytes());
    data.extend_from_slice(&form_type.to_bytes());
    data.extend_from_slice(body);
    data
}

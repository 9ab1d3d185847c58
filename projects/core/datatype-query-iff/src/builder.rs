//! In-memory composition of `FORM` containers.
//!
//! Only compiled with the `builder` feature (or in tests); used to produce
//! fixtures for tests, benchmarks and fuzz seeds.

use crate::reader::{CHUNK_HEADER_SIZE, FORM_HEADER_SIZE};
use crate::{ChunkId, ID_FORM};
use endian_writer::{BigEndianWriter, EndianWriter};

/// Builds a single `FORM` with a flat list of chunks.
///
/// Odd sized payloads are padded with a zero byte, as IFF requires.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    form_type: ChunkId,
    chunks: Vec<(ChunkId, Vec<u8>)>,
}

impl FormBuilder {
    /// Start an empty container of type `form_type`.
    pub fn new(form_type: ChunkId) -> Self {
        Self {
            form_type,
            chunks: Vec::new(),
        }
    }

    /// Append a chunk.
    pub fn chunk(mut self, id: ChunkId, payload: impl Into<Vec<u8>>) -> Self {
        self.push_chunk(id, payload);
        self
    }

    /// Append a chunk without consuming the builder.
    pub fn push_chunk(&mut self, id: ChunkId, payload: impl Into<Vec<u8>>) {
        self.chunks.push((id, payload.into()));
    }

    /// Value of the `FORM` size field: the type plus every padded chunk.
    pub fn body_size(&self) -> usize {
        4 + self
            .chunks
            .iter()
            .map(|(_, payload)| CHUNK_HEADER_SIZE + payload.len() + (payload.len() & 1))
            .sum::<usize>()
    }

    /// Serialize the container.
    pub fn build(&self) -> Vec<u8> {
        let body_size = self.body_size();
        let mut data = vec![0u8; 8 + body_size];

        // SAFETY: `data` is 8 + body_size bytes and body_size counts the 4 byte form
        // type, so the writes ending at byte 12 stay in bounds.
        unsafe {
            let mut writer = BigEndianWriter::new(data.as_mut_ptr());
            writer.write_u32_at(ID_FORM.as_u32(), 0);
            writer.write_u32_at(body_size as u32, 4);
            writer.write_u32_at(self.form_type.as_u32(), 8);
        }

        let mut offset = FORM_HEADER_SIZE;
        for (id, payload) in &self.chunks {
            // SAFETY: body_size counts a CHUNK_HEADER_SIZE (8) byte header for every
            // chunk, so `offset + 8` never passes the end of `data`.
            unsafe {
                let mut writer = BigEndianWriter::new(data.as_mut_ptr().add(offset));
                writer.write_u32_at(id.as_u32(), 0);
                writer.write_u32_at(payload.len() as u32, 4);
            }
            offset += CHUNK_HEADER_SIZE;
            data[offset..offset + payload.len()].copy_from_slice(payload);
            offset += payload.len() + (payload.len() & 1);
        }

        data
    }
}

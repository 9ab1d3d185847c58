#![no_main]

// Walks arbitrary bytes as a FORM, stopping at one chunk ID, and checks every chunk
// stays inside the declared container.

use datatype_query_iff::{ChunkId, ChunkReader, CHUNK_HEADER_SIZE};
use libfuzzer_sys::{arbitrary, fuzz_target};

const MAX_READ: u32 = 4096;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct ScanInput {
    pub stop: [u8; 4],
    pub read_payload: bool,
    pub data: Vec<u8>,
}

fuzz_target!(|input: ScanInput| {
    let mut reader = ChunkReader::new(input.data.as_slice());
    let Ok(form_type) = reader.container_type() else {
        return;
    };
    if reader.stop_at(form_type, ChunkId::from_bytes(input.stop)).is_err() {
        return;
    }

    // The container header was read, so the size field is present.
    let declared = u64::from(u32::from_be_bytes([
        input.data[4],
        input.data[5],
        input.data[6],
        input.data[7],
    ]));

    let mut framed = 4u64;
    while let Ok(Some(info)) = reader.advance() {
        assert_eq!(info.container, form_type);
        assert_eq!(info.id, ChunkId::from_bytes(input.stop));

        framed += CHUNK_HEADER_SIZE as u64 + u64::from(info.size);
        assert!(framed <= declared, "chunk extends past its container");

        if input.read_payload && info.size <= MAX_READ {
            match reader.read_bytes(info.size as usize) {
                Ok(payload) => assert_eq!(payload.len(), info.size as usize),
                Err(_) => return,
            }
            assert_eq!(reader.remaining_in_chunk(), Some(0));
        }
        if reader.pop_chunk().is_err() {
            return;
        }
        assert!(reader.current_chunk().is_none());
    }
});

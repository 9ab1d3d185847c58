use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datatype_query_iff::{ChunkId, ChunkReader, FormBuilder};
use std::hint::black_box;

const ID_DTYP: ChunkId = ChunkId::from_bytes(*b"DTYP");
const ID_DTHD: ChunkId = ChunkId::from_bytes(*b"DTHD");
const ID_DTTL: ChunkId = ChunkId::from_bytes(*b"DTTL");
const ID_NAME: ChunkId = ChunkId::from_bytes(*b"NAME");

/// A descriptor-shaped container: one header, then `tools` tool chunks
/// interleaved with filler chunks the reader has to skip.
fn make_descriptor(tools: usize) -> Vec<u8> {
    let mut builder = FormBuilder::new(ID_DTYP).chunk(ID_DTHD, vec![0u8; 64]);
    for index in 0..tools {
        builder.push_chunk(ID_NAME, vec![b'n'; 33 + (index % 7)]);
        let mut tool = vec![0u8; 8];
        tool[1] = 3; // edit
        tool[3] = 1; // shell launch
        tool[7] = 8; // program right after the prefix
        tool.extend_from_slice(format!("SYS:Utilities/Tool{index}\0").as_bytes());
        builder.push_chunk(ID_DTTL, tool);
    }
    builder.build()
}

fn scan(data: &[u8]) -> usize {
    let mut reader = ChunkReader::new(data);
    let mut payload_bytes = 0;
    if reader.stop_at(ID_DTYP, ID_DTTL).is_err() {
        return 0;
    }
    while let Ok(Some(chunk)) = reader.advance() {
        if let Ok(payload) = reader.read_bytes(chunk.size as usize) {
            payload_bytes += payload.len();
        }
        if reader.pop_chunk().is_err() {
            break;
        }
    }
    payload_bytes
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scan DTYP Tool Chunks");

    for tools in [4usize, 64, 4096] {
        let data = make_descriptor(tools);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("scan", tools), &data, |b, data| {
            b.iter(|| scan(black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

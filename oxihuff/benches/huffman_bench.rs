//! Performance benchmarks for oxihuff
//!
//! This benchmark suite evaluates:
//! - Tree construction over sparse and dense alphabets
//! - Block encoding and decoding throughput
//! - Whole-stream compression/decompression across block sizes

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxihuff::{
    BlockDecoder, BlockEncoder, FrequencyTable, HuffmanConfig, HuffmanTree, compress_with,
    decompress,
};
use std::hint::black_box;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Single repeated byte (one-bit codewords)
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random data - flat histogram, codewords near 8 bits
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            // Linear congruential generator
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Text-like data - skewed histogram
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! ";
        let mut data = Vec::with_capacity(size);
        while data.len() < size {
            let remaining = size - data.len();
            let chunk_size = remaining.min(text.len());
            data.extend_from_slice(&text[..chunk_size]);
        }
        data
    }

    /// Geometric-ish distribution - long codewords for rare bytes
    pub fn skewed(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0xDEADBEEF;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push(((seed >> 32) as u32).leading_zeros() as u8);
        }
        data
    }
}

const PATTERNS: [(&str, PatternGenerator); 4] = [
    ("uniform", test_data::uniform as PatternGenerator),
    ("random", test_data::random as PatternGenerator),
    ("text", test_data::text_like as PatternGenerator),
    ("skewed", test_data::skewed as PatternGenerator),
];

const SIZE: usize = 1024 * 1024;

fn tree_for(data: &[u8]) -> HuffmanTree {
    let mut freqs = FrequencyTable::new();
    freqs.record(data);
    HuffmanTree::from_frequencies(&freqs).unwrap()
}

/// Benchmark tree construction from frequency tables
fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for (pattern_name, generator) in PATTERNS {
        let mut freqs = FrequencyTable::new();
        freqs.record(&generator(SIZE));

        group.bench_with_input(
            BenchmarkId::from_parameter(pattern_name),
            &freqs,
            |b, freqs| {
                b.iter(|| {
                    let tree = HuffmanTree::from_frequencies(black_box(freqs)).unwrap();
                    black_box(tree.codebook());
                });
            },
        );
    }

    group.finish();
}

/// Benchmark block encoding throughput
fn bench_block_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_encode");

    for (pattern_name, generator) in PATTERNS {
        let data = generator(SIZE);
        let encoder = BlockEncoder::new(tree_for(&data).codebook());

        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(pattern_name),
            &data,
            |b, data| {
                b.iter(|| {
                    let bits = encoder.encode(black_box(data)).unwrap();
                    black_box(bits);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark block decoding throughput
fn bench_block_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_decode");

    for (pattern_name, generator) in PATTERNS {
        let data = generator(SIZE);
        let tree = tree_for(&data);
        let bits = BlockEncoder::new(tree.codebook()).encode(&data).unwrap();
        let mut decoder = BlockDecoder::new(tree);

        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(pattern_name),
            &bits,
            |b, bits| {
                b.iter(|| {
                    let out = decoder.decode(black_box(bits));
                    black_box(out);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark whole-stream roundtrip across block sizes
fn bench_stream_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_roundtrip");
    group.sample_size(10);

    let data = test_data::text_like(SIZE);
    for block_size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        let config = HuffmanConfig::new(block_size).unwrap();

        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &data,
            |b, data| {
                b.iter(|| {
                    let compressed = compress_with(black_box(data), &config).unwrap();
                    let decompressed = decompress(&compressed).unwrap();
                    black_box(decompressed);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_build,
    bench_block_encode,
    bench_block_decode,
    bench_stream_roundtrip,
);
criterion_main!(benches);

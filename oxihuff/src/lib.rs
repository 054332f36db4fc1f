//! # OxiHuff: Pure Rust Block-Streaming Huffman Compression
//!
//! This crate compresses arbitrary byte streams with a single static
//! Huffman code built from whole-input byte frequencies, and writes the
//! result as a self-describing stream of bit-length-prefixed blocks.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Linear tree construction**: Two-queue merge over sorted leaves
//! - **Bounded memory**: Input is read and decoded block by block
//! - **Cross-block codewords**: The decoder keeps its tree position between
//!   blocks, so block records need not end on codeword boundaries
//! - **No recursion**: Trees of any depth are walked with explicit stacks
//!
//! ## Stream Layout
//!
//! - `u16` alphabet size and `u32` tree shape length, little-endian
//! - Preorder tree shape bits (internal 0, leaf 1) padded to 64-bit words
//! - One alphabet byte per leaf, in leaf visit order
//! - Repeated blocks: `u32` bit length followed by padded 64-bit words
//!
//! Empty input compresses to empty output.
//!
//! ## Example
//!
//! ```rust
//! use oxihuff::{compress, decompress};
//!
//! let original = b"she sells sea shells by the sea shore";
//!
//! let compressed = compress(original).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//!
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Streaming
//!
//! Compression needs two passes over the input, so the source must be
//! seekable. Decompression reads forward only.
//!
//! ```rust
//! use oxihuff::{HuffmanConfig, compress_stream, decompress_stream};
//! use std::io::Cursor;
//!
//! let data = b"abracadabra".repeat(1000);
//! let config = HuffmanConfig::new(4096).unwrap();
//!
//! let mut compressed = Vec::new();
//! let summary = compress_stream(&mut Cursor::new(&data), &mut compressed, &config).unwrap();
//! assert_eq!(summary.blocks, 3);
//!
//! let mut restored = Vec::new();
//! decompress_stream(Cursor::new(&compressed), &mut restored).unwrap();
//! assert_eq!(restored, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod codebook;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod format;
pub mod frequency;
pub mod tree;

pub use codebook::Codebook;
pub use config::{DEFAULT_BLOCK_SIZE, HuffmanConfig, MAX_BLOCK_SIZE};
pub use decoder::BlockDecoder;
pub use encoder::BlockEncoder;
pub use format::{
    DecodeSummary, EncodeSummary, StreamDecoder, StreamEncoder, StreamHeader, StreamInfo,
    compress_stream, compress_stream_with_progress, decompress_stream,
    decompress_stream_with_progress,
};
pub use frequency::{ALPHABET_SIZE, FrequencyTable};
pub use oxihuff_core::{BitBuffer, HuffError, Result};
pub use tree::{FILLER_SYMBOL, HuffmanTree, Node, NodeId};

use std::io::Cursor;

/// Compress `data` with the default configuration.
///
/// # Example
///
/// ```rust
/// use oxihuff::compress;
///
/// assert!(compress(b"").unwrap().is_empty());
/// assert!(!compress(b"x").unwrap().is_empty());
/// ```
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with(data, &HuffmanConfig::DEFAULT)
}

/// Compress `data` with the given configuration.
///
/// # Example
///
/// ```rust
/// use oxihuff::{HuffmanConfig, compress_with, decompress};
///
/// let config = HuffmanConfig::new(1).unwrap();
/// let compressed = compress_with(b"tiny blocks", &config).unwrap();
/// assert_eq!(decompress(&compressed).unwrap(), b"tiny blocks");
/// ```
pub fn compress_with(data: &[u8], config: &HuffmanConfig) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress_stream(&mut Cursor::new(data), &mut output, config)?;
    Ok(output)
}

/// Decompress a complete stream held in memory.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_stream(data, &mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_text() {
        let original = b"Hello, World! Hello, Huffman!";
        let compressed = compress(original).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), original.to_vec());
    }

    #[test]
    fn test_empty_roundtrip() {
        assert!(compress(b"").unwrap().is_empty());
        assert!(decompress(b"").unwrap().is_empty());
    }

    #[test]
    fn test_skewed_input_shrinks() {
        let mut data = vec![b'a'; 10_000];
        data.extend_from_slice(b"bcdefg");
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len() / 4);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_block_size_does_not_change_output_bytes() {
        let data = b"the block size only moves record boundaries".repeat(50);
        for block_size in [1, 7, 64, 4096] {
            let config = HuffmanConfig::new(block_size).unwrap();
            let compressed = compress_with(&data, &config).unwrap();
            assert_eq!(decompress(&compressed).unwrap(), data);
        }
    }
}

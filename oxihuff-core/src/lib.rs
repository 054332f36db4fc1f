//! # OxiHuff Core
//!
//! Core components for the OxiHuff compressor.
//!
//! This crate provides the building blocks the codec is layered on:
//!
//! - [`bitbuf`]: Growable bit-addressable container backed by `u64` words
//! - [`record`]: Fixed-width little-endian record I/O over `Read`/`Write`
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Driver                                              │
//! │     CLI, file handling, progress                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Container                                           │
//! │     Header, tree record, block records                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Codec                                               │
//! │     Frequencies, Huffman tree, block encoder/decoder    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L0: Primitives (this crate)                             │
//! │     BitBuffer, RecordReader/Writer, errors              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_core::BitBuffer;
//!
//! let mut code = BitBuffer::new();
//! code.push(false);
//! code.push(true);
//!
//! let mut block = BitBuffer::new();
//! block.extend_from_bitbuffer(&code);
//! block.extend_from_bitbuffer(&code);
//! assert_eq!(block.to_string(), "0101");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bitbuf;
pub mod error;
pub mod record;

// Re-exports for convenience
pub use bitbuf::{BitBuffer, WORD_BITS};
pub use error::{HuffError, Result};
pub use record::{RecordReader, RecordWriter, read_up_to};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitbuf::BitBuffer;
    pub use crate::error::{HuffError, Result};
    pub use crate::record::{RecordReader, RecordWriter};
}

//! Codec configuration.

use oxihuff_core::{HuffError, Result};

/// Default number of raw bytes per block record.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Largest accepted block size.
///
/// A codeword is at most 255 bits long (a tree over 256 leaves), so this
/// bound keeps the bit length of any block within the `u32` length prefix.
pub const MAX_BLOCK_SIZE: usize = (u32::MAX / 256) as usize;

/// Huffman codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanConfig {
    /// Raw bytes read and encoded per block record.
    pub block_size: usize,
}

impl HuffmanConfig {
    /// Default configuration (64 KiB blocks).
    pub const DEFAULT: Self = Self {
        block_size: DEFAULT_BLOCK_SIZE,
    };

    /// Create a configuration with the given block size.
    pub fn new(block_size: usize) -> Result<Self> {
        let config = Self { block_size };
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce a valid stream.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(HuffError::invalid_config("block size must be at least 1"));
        }
        if self.block_size > MAX_BLOCK_SIZE {
            return Err(HuffError::invalid_config(format!(
                "block size {} exceeds maximum {}",
                self.block_size, MAX_BLOCK_SIZE
            )));
        }
        Ok(())
    }
}

impl Default for HuffmanConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

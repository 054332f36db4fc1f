//! Block encoding.

use crate::codebook::Codebook;
use oxihuff_core::{BitBuffer, HuffError, Result};

/// Turns raw bytes into packed codewords.
///
/// Stateless across calls: each block is a pure function of the codebook
/// and the input bytes.
#[derive(Debug, Clone)]
pub struct BlockEncoder {
    codebook: Codebook,
}

impl BlockEncoder {
    /// Create an encoder for the given codebook.
    pub fn new(codebook: Codebook) -> Self {
        Self { codebook }
    }

    /// The codebook in use.
    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    /// Encode `bytes` into a fresh bit buffer.
    pub fn encode(&self, bytes: &[u8]) -> Result<BitBuffer> {
        let mut bits = BitBuffer::with_capacity(bytes.len() * 8);
        self.encode_into(bytes, &mut bits)?;
        Ok(bits)
    }

    /// Append the codewords for `bytes` to `out`, in input order.
    ///
    /// A byte with no codeword fails with [`HuffError::OutOfRange`]; `out`
    /// keeps the codewords of the bytes before it.
    pub fn encode_into(&self, bytes: &[u8], out: &mut BitBuffer) -> Result<()> {
        for &byte in bytes {
            let code = self
                .codebook
                .get(byte)
                .ok_or_else(|| HuffError::out_of_range(byte as usize, self.codebook.len()))?;
            out.extend_from_bitbuffer(code);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::tree::HuffmanTree;

    fn encoder_for(data: &[u8]) -> BlockEncoder {
        let mut freqs = FrequencyTable::new();
        freqs.record(data);
        BlockEncoder::new(HuffmanTree::from_frequencies(&freqs).unwrap().codebook())
    }

    #[test]
    fn test_encode_concatenates_codewords() {
        // b -> 0, a -> 1
        let encoder = encoder_for(b"aab");
        let bits = encoder.encode(b"abba").unwrap();
        assert_eq!(bits.to_string(), "1001");
    }

    #[test]
    fn test_encode_empty() {
        let encoder = encoder_for(b"xyz");
        assert!(encoder.encode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_encode_unknown_symbol() {
        let encoder = encoder_for(b"aab");
        let err = encoder.encode(b"abc").unwrap_err();
        assert!(matches!(err, HuffError::OutOfRange { index: 99, len: 2 }));
    }

    #[test]
    fn test_encode_into_appends() {
        let encoder = encoder_for(b"aab");
        let mut bits = encoder.encode(b"a").unwrap();
        encoder.encode_into(b"b", &mut bits).unwrap();
        assert_eq!(bits.to_string(), "10");
    }

    #[test]
    fn test_encoded_length_matches_codebook() {
        let data = b"it was the best of times, it was the worst of times";
        let mut freqs = FrequencyTable::new();
        freqs.record(data);
        let codebook = HuffmanTree::from_frequencies(&freqs).unwrap().codebook();
        let expected = codebook.encoded_bits(freqs.counts());

        let bits = BlockEncoder::new(codebook).encode(data).unwrap();
        assert_eq!(bits.len() as u64, expected);
    }
}

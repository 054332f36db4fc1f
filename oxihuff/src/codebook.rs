//! Symbol to codeword table.

use crate::frequency::ALPHABET_SIZE;
use oxihuff_core::BitBuffer;

/// Codewords for the symbols that are leaves of a [`HuffmanTree`].
///
/// Derived once by [`HuffmanTree::codebook`] and read-only afterwards.
///
/// [`HuffmanTree`]: crate::tree::HuffmanTree
/// [`HuffmanTree::codebook`]: crate::tree::HuffmanTree::codebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook {
    codes: [Option<BitBuffer>; ALPHABET_SIZE],
}

impl Codebook {
    /// Create an empty codebook.
    pub(crate) fn new() -> Self {
        Self {
            codes: std::array::from_fn(|_| None),
        }
    }

    /// Record `code` for `symbol` unless the symbol already has one.
    ///
    /// The first leaf reached for a symbol wins, which keeps a real symbol's
    /// codeword when a filler leaf carries the same byte.
    pub(crate) fn insert(&mut self, symbol: u8, code: &BitBuffer) {
        let slot = &mut self.codes[symbol as usize];
        if slot.is_none() {
            *slot = Some(code.clone());
        }
    }

    /// Codeword for `symbol`, if the symbol is in the tree.
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<&BitBuffer> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a codeword.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    /// Whether no symbol has a codeword.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Iterate over `(symbol, codeword)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitBuffer)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u8, code)))
    }

    /// Length of the longest codeword.
    pub fn max_code_len(&self) -> usize {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Exact payload size in bits for input with the given frequencies.
    ///
    /// Symbols without a codeword contribute nothing.
    pub fn encoded_bits(&self, freqs: &[u64; ALPHABET_SIZE]) -> u64 {
        self.iter().fold(0u64, |acc, (symbol, code)| {
            acc.saturating_add(freqs[symbol as usize].saturating_mul(code.len() as u64))
        })
    }

    /// Average codeword length in bits, weighted by `freqs`.
    pub fn average_code_len(&self, freqs: &[u64; ALPHABET_SIZE]) -> f64 {
        let total: u64 = self
            .iter()
            .map(|(symbol, _)| freqs[symbol as usize])
            .fold(0u64, u64::saturating_add);
        if total == 0 {
            return 0.0;
        }
        self.encoded_bits(freqs) as f64 / total as f64
    }

    /// Whether no codeword is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitBuffer> = self.iter().map(|(_, code)| code).collect();
        for (i, short) in codes.iter().enumerate() {
            for (j, long) in codes.iter().enumerate() {
                if i != j
                    && short.len() <= long.len()
                    && short.iter().zip(long.iter()).all(|(a, b)| a == b)
                {
                    return false;
                }
            }
        }
        true
    }
}

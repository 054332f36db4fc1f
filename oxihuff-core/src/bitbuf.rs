//! Growable bit-addressable container.
//!
//! [`BitBuffer`] stores an ordered sequence of bits packed into `u64` words.
//! Bit `i` lives in word `i / 64` at position `i % 64`, so the first bit of
//! a word is its least significant bit (the same LSB-first convention the
//! bit reader/writer pair uses for byte streams).
//!
//! The logical length is tracked independently of word alignment. Bits of
//! the final word beyond the logical length are always kept at zero, which
//! makes [`BitBuffer::words`] deterministic for binary output and lets two
//! buffers compare equal word by word.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::BitBuffer;
//!
//! let mut bits = BitBuffer::new();
//! bits.push(true);
//! bits.push(false);
//! bits.push(true);
//! assert_eq!(bits.len(), 3);
//! assert_eq!(bits.words(), &[0b101]);
//!
//! bits.truncate(2).unwrap();
//! assert_eq!(bits.words(), &[0b01]);
//! ```

use crate::error::{HuffError, Result};

/// Number of bits in one backing word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Mask selecting the low `count` bits of a word (`count < 64`).
#[inline]
fn low_mask(count: usize) -> u64 {
    (1u64 << count).wrapping_sub(1)
}

/// A growable sequence of bits backed by `u64` words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    /// Backing words (LSB-first within each word).
    words: Vec<u64>,
    /// Number of valid bits.
    len: usize,
}

impl BitBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for at least `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(WORD_BITS)),
            len: 0,
        }
    }

    /// Build a buffer from raw words holding `len` valid bits.
    ///
    /// Words beyond those needed for `len` bits are dropped and the unused
    /// high bits of the final word are cleared.
    pub fn from_words(mut words: Vec<u64>, len: usize) -> Result<Self> {
        let available = words.len().saturating_mul(WORD_BITS);
        if len > available {
            return Err(HuffError::out_of_range(len, available));
        }

        words.truncate(len.div_ceil(WORD_BITS));
        let mut buf = Self { words, len };
        buf.clear_tail();
        Ok(buf)
    }

    /// Number of valid bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of backing words currently in use.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Backing words, including the partially filled final word.
    ///
    /// High bits beyond [`len`](Self::len) are always zero.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Consume the buffer and return its backing words.
    pub fn into_words(self) -> Vec<u64> {
        self.words
    }

    /// Append one bit.
    ///
    /// A new word is allocated only when the current final word is full.
    #[inline]
    pub fn push(&mut self, bit: bool) {
        let offset = self.len % WORD_BITS;
        if offset == 0 {
            self.words.push(0);
        }
        if bit {
            let last = self.len / WORD_BITS;
            self.words[last] |= 1u64 << offset;
        }
        self.len += 1;
    }

    /// Remove and return the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }

        let index = self.len - 1;
        let word = index / WORD_BITS;
        let mask = 1u64 << (index % WORD_BITS);
        let bit = self.words[word] & mask != 0;
        self.words[word] &= !mask;
        self.len = index;

        if self.len % WORD_BITS == 0 {
            self.words.pop();
        }

        Some(bit)
    }

    /// Read the bit at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len {
            return Err(HuffError::out_of_range(index, self.len));
        }
        Ok((self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 != 0)
    }

    /// Overwrite the bit at `index`.
    pub fn set(&mut self, index: usize, bit: bool) -> Result<()> {
        if index >= self.len {
            return Err(HuffError::out_of_range(index, self.len));
        }

        let mask = 1u64 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        if bit {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        Ok(())
    }

    /// Remove the last `count` bits.
    ///
    /// Fails with [`HuffError::OutOfRange`] when `count` exceeds the current
    /// length; the buffer is left untouched in that case. Trailing words
    /// that become unused are released and the stale bits of the new final
    /// word are cleared, so later pushes always start from zero.
    pub fn truncate(&mut self, count: usize) -> Result<()> {
        if count > self.len {
            return Err(HuffError::out_of_range(count, self.len));
        }

        self.len -= count;
        self.words.truncate(self.len.div_ceil(WORD_BITS));
        self.clear_tail();
        Ok(())
    }

    /// Append every bit of `other`, in order.
    ///
    /// Capacity for the combined length is reserved before copying. When
    /// this buffer ends on a word boundary the words are copied directly,
    /// otherwise each incoming word is split across two destination words.
    pub fn extend_from_bitbuffer(&mut self, other: &BitBuffer) {
        if other.is_empty() {
            return;
        }

        let total = self.len + other.len;
        let needed = total.div_ceil(WORD_BITS);
        self.words.reserve(needed.saturating_sub(self.words.len()));

        let shift = self.len % WORD_BITS;
        if shift == 0 {
            self.words.extend_from_slice(&other.words);
        } else {
            let mut last = self.words.len() - 1;
            for &word in &other.words {
                self.words[last] |= word << shift;
                self.words.push(word >> (WORD_BITS - shift));
                last += 1;
            }
            // The split can leave one all-zero word past the end.
            self.words.truncate(needed);
        }

        self.len = total;
    }

    /// Remove every bit, keeping the allocation.
    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buf: self,
            front: 0,
            back: self.len,
        }
    }

    /// Zero the bits of the final word past the logical length.
    fn clear_tail(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= low_mask(used);
            }
        }
    }
}

impl Extend<bool> for BitBuffer {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromIterator<bool> for BitBuffer {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<'a> IntoIterator for &'a BitBuffer {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Iterator over the bits of a [`BitBuffer`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    buf: &'a BitBuffer,
    front: usize,
    back: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        if self.front >= self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        Some((self.buf.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<bool> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        let index = self.back;
        Some((self.buf.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 != 0)
    }
}

impl ExactSizeIterator for Iter<'_> {}

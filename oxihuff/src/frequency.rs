//! Byte frequency collection.

/// Number of symbols in the byte alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence counts for every byte value.
///
/// `record` may be called any number of times, so the counts can be
/// gathered block by block in a pre-pass over a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Create a table with every count at zero.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Create a table from existing counts.
    pub fn from_counts(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }

    /// Accumulate the occurrences in `bytes`.
    pub fn record(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let slot = &mut self.counts[byte as usize];
            *slot = slot.saturating_add(1);
        }
    }

    /// Copy of the 256-entry count table.
    pub fn snapshot(&self) -> [u64; ALPHABET_SIZE] {
        self.counts
    }

    /// Borrow the count table.
    pub fn counts(&self) -> &[u64; ALPHABET_SIZE] {
        &self.counts
    }

    /// Count for one symbol.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Whether no byte has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut freqs = FrequencyTable::new();
        assert!(freqs.is_empty());

        freqs.record(b"abracadabra");
        freqs.record(b"aa");

        assert_eq!(freqs.count(b'a'), 7);
        assert_eq!(freqs.count(b'b'), 2);
        assert_eq!(freqs.count(b'z'), 0);
        assert_eq!(freqs.total(), 13);
        assert_eq!(freqs.distinct_symbols(), 5);
        assert!(!freqs.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut freqs = FrequencyTable::new();
        freqs.record(&[0, 255]);
        let snap = freqs.snapshot();
        freqs.record(&[0]);

        assert_eq!(snap[0], 1);
        assert_eq!(snap[255], 1);
        assert_eq!(freqs.count(0), 2);
    }

    #[test]
    fn test_counts_saturate() {
        let mut counts = [0u64; ALPHABET_SIZE];
        counts[7] = u64::MAX;
        let mut freqs = FrequencyTable::from_counts(counts);
        freqs.record(&[7, 7]);
        assert_eq!(freqs.count(7), u64::MAX);
    }
}

//! Error types for OxiHuff operations.
//!
//! Every failure in the codec is unrecoverable at the point of detection and
//! propagates to the caller unchanged. The surrounding driver decides whether
//! to abort or report per file.

use std::io;
use thiserror::Error;

/// The main error type for OxiHuff operations.
#[derive(Debug, Error)]
pub enum HuffError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Tree construction was attempted with zero total frequency.
    #[error("No data: every symbol frequency is zero")]
    NoData,

    /// Index past the logical end of a container, alphabet or codebook.
    #[error("Index {index} out of range for length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Logical length at the time of access.
        len: usize,
    },

    /// Serialized tree shape and alphabet are inconsistent or truncated.
    #[error("Corrupt tree: {message}")]
    CorruptTree {
        /// Description of the inconsistency.
        message: String,
    },

    /// A declared length promises more bytes than the source delivered.
    #[error("Truncated stream: expected {expected} bytes, found {found}")]
    TruncatedStream {
        /// Number of bytes the record declared.
        expected: usize,
        /// Number of bytes actually available.
        found: usize,
    },

    /// Rejected configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

/// Result type alias for OxiHuff operations.
pub type Result<T> = std::result::Result<T, HuffError>;

impl HuffError {
    /// Create an out-of-range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    /// Create a corrupt tree error.
    pub fn corrupt_tree(message: impl Into<String>) -> Self {
        Self::CorruptTree {
            message: message.into(),
        }
    }

    /// Create a truncated stream error.
    pub fn truncated(expected: usize, found: usize) -> Self {
        Self::TruncatedStream { expected, found }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error indicates damaged compressed input rather than
    /// a caller or environment problem.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::CorruptTree { .. } | Self::TruncatedStream { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HuffError::out_of_range(70, 64);
        assert!(err.to_string().contains("70"));
        assert!(err.to_string().contains("64"));

        let err = HuffError::corrupt_tree("shape exhausted");
        assert!(err.to_string().contains("shape exhausted"));

        let err = HuffError::truncated(8, 3);
        assert!(err.to_string().contains("Truncated"));

        assert!(HuffError::NoData.to_string().contains("zero"));
    }

    #[test]
    fn test_is_corruption() {
        assert!(HuffError::corrupt_tree("x").is_corruption());
        assert!(HuffError::truncated(4, 0).is_corruption());
        assert!(!HuffError::NoData.is_corruption());
        assert!(!HuffError::out_of_range(1, 0).is_corruption());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: HuffError = io_err.into();
        assert!(matches!(err, HuffError::Io(_)));
    }
}

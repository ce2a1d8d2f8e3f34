//! Error types for oxistream operations.
//!
//! This module provides the error type covering all failure conditions in
//! positioned stream access: I/O errors from the underlying medium, short
//! reads, step-stack underflow, variable-length integer overflow, and
//! invalid alignment requests.

use std::io;
use thiserror::Error;

/// The main error type for oxistream operations.
#[derive(Debug, Error)]
pub enum OxiStreamError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unexpected end of stream.
    #[error("Unexpected end of stream at offset {offset}: expected {expected} more bytes")]
    UnexpectedEof {
        /// Stream offset where the read started.
        offset: u64,
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// Stepping out more times than stepped in.
    #[error("Step underflow: requested {requested} step(s) out with only {depth} saved")]
    StepUnderflow {
        /// Number of steps the caller asked to pop.
        requested: usize,
        /// Number of saved positions on the stack.
        depth: usize,
    },

    /// Variable-length integer exceeds its width cap.
    #[error("Varint overflow: encoded value does not fit in {max_bits} bits")]
    VarintOverflow {
        /// Width cap of the target integer in bits.
        max_bits: u32,
    },

    /// Alignment boundary of zero.
    #[error("Invalid alignment: boundary must be non-zero")]
    InvalidAlignment,
}

/// Result type alias for oxistream operations.
pub type Result<T> = std::result::Result<T, OxiStreamError>;

impl OxiStreamError {
    /// Create an unexpected end-of-stream error.
    pub fn unexpected_eof(offset: u64, expected: usize) -> Self {
        Self::UnexpectedEof { offset, expected }
    }

    /// Create a step underflow error.
    pub fn step_underflow(requested: usize, depth: usize) -> Self {
        Self::StepUnderflow { requested, depth }
    }

    /// Create a varint overflow error.
    pub fn varint_overflow(max_bits: u32) -> Self {
        Self::VarintOverflow { max_bits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiStreamError::unexpected_eof(128, 4);
        assert!(err.to_string().contains("offset 128"));
        assert!(err.to_string().contains("4 more bytes"));

        let err = OxiStreamError::step_underflow(3, 1);
        assert!(err.to_string().contains("Step underflow"));

        let err = OxiStreamError::varint_overflow(32);
        assert!(err.to_string().contains("32 bits"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: OxiStreamError = io_err.into();
        assert!(matches!(err, OxiStreamError::Io(_)));
    }
}

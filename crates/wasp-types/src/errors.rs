//! # Error Types
//!
//! Errors raised while parsing identifiers.

use thiserror::Error;

/// Errors that can occur when parsing a hex identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Input was empty (or only a `0x` prefix).
    #[error("{kind} is empty")]
    Empty { kind: &'static str },

    /// Input contains a character outside `[0-9a-fA-F]`.
    #[error("{kind} contains non-hex character {found:?}")]
    NotHex { kind: &'static str, found: char },

    /// Decoded length does not match the expected byte length.
    #[error("{kind} must be {expected} bytes, got {actual}")]
    WrongLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Odd number of hex digits.
    #[error("{kind} has an odd number of hex digits")]
    OddLength { kind: &'static str },
}

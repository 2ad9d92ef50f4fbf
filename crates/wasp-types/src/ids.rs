//! # Identifiers
//!
//! Hex-encoded identifiers used in node API paths.
//!
//! - `ChainId`: 32-byte chain address, `0x`-prefixed hex.
//! - `RequestId`: 32-byte request identifier, `0x`-prefixed hex.
//!
//! Both are normalized to lowercase with a `0x` prefix so that the same id
//! always produces the same request path on every node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::IdError;

/// Byte length of a chain id.
pub const CHAIN_ID_LENGTH: usize = 32;

/// Byte length of a request id.
pub const REQUEST_ID_LENGTH: usize = 32;

fn normalize_hex(kind: &'static str, input: &str, expected: usize) -> Result<String, IdError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if let Some(found) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(IdError::NotHex { kind, found });
    }
    if digits.len() % 2 != 0 {
        return Err(IdError::OddLength { kind });
    }
    let actual = digits.len() / 2;
    if actual != expected {
        return Err(IdError::WrongLength {
            kind,
            expected,
            actual,
        });
    }

    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $len:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Parse and normalize a hex string.
            pub fn parse(input: &str) -> Result<Self, IdError> {
                normalize_hex($kind, input, $len).map(Self)
            }

            /// Normalized `0x`-prefixed lowercase hex.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_id!(
    /// Identifier of a chain hosted by a committee of nodes.
    ChainId,
    "chain id",
    CHAIN_ID_LENGTH
);

hex_id!(
    /// Identifier of an on-ledger or off-ledger request.
    RequestId,
    "request id",
    REQUEST_ID_LENGTH
);

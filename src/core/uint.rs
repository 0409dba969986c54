//! Fixed-width identifiers
//!
//! `Uint256` names assets and transactions, `Uint160` names owners
//! (program hashes). Both render as lowercase hex.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Hex parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UintError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    #[error("Wrong length: expected {expected} bytes, got {got}")]
    WrongLength { expected: usize, got: usize },
}

macro_rules! fixed_bytes {
    ($name:ident, $len:expr) => {
        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn zero() -> Self {
                Self([0u8; $len])
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn from_slice(bytes: &[u8]) -> Result<Self, UintError> {
                let array: [u8; $len] =
                    bytes.try_into().map_err(|_| UintError::WrongLength {
                        expected: $len,
                        got: bytes.len(),
                    })?;
                Ok(Self(array))
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl FromStr for $name {
            type Err = UintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode(s).map_err(|_| UintError::InvalidHex(s.to_string()))?;
                Self::from_slice(&bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// =============================================================================
// Uint256
// =============================================================================

/// 32-byte identifier for assets and transactions
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uint256([u8; 32]);

fixed_bytes!(Uint256, 32);

// =============================================================================
// Uint160
// =============================================================================

/// 20-byte program hash identifying an owner or a verification script
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uint160([u8; 20]);

fixed_bytes!(Uint160, 20);

/// Program hashes compare as little-endian integers: the last byte is the
/// most significant.
impl Ord for Uint160 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for Uint160 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let hash = Uint160::new([7u8; 20]);
        let parsed: Uint160 = hash.to_hex().parse().unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(
            "abcd".parse::<Uint256>(),
            Err(UintError::WrongLength {
                expected: 32,
                got: 2
            })
        );
        assert!(matches!(
            "xyz".parse::<Uint160>(),
            Err(UintError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_uint160_orders_from_last_byte() {
        let mut low = [0u8; 20];
        let mut high = [0u8; 20];
        // Larger first byte, smaller last byte.
        low[0] = 0xff;
        low[19] = 0x01;
        high[19] = 0x02;

        let low = Uint160::new(low);
        let high = Uint160::new(high);
        assert!(low < high);

        let mut sorted = vec![high, low];
        sorted.sort();
        assert_eq!(sorted, vec![low, high]);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = Uint256::new([0xab; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: Uint256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

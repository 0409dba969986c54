//! Address codec
//!
//! An address is `Base58Check(version || program_hash)`, where the checksum
//! is the first four bytes of the double SHA-256 of the payload.

use crate::core::uint::Uint160;
use crate::crypto::double_sha256;
use thiserror::Error;

/// Version byte prefixed to every address payload
pub const ADDRESS_VERSION: u8 = 0x17;

const CHECKSUM_LEN: usize = 4;
const ADDRESS_PAYLOAD_LEN: usize = 1 + Uint160::LEN + CHECKSUM_LEN;

/// Address decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is not valid base58: {0}")]
    InvalidEncoding(String),
    #[error("Invalid address length: {0} bytes")]
    InvalidLength(usize),
    #[error("Unknown address version: {0:#04x}")]
    InvalidVersion(u8),
    #[error("Address checksum mismatch")]
    ChecksumMismatch,
}

/// Decode an address into the program hash it pays to
pub fn to_script_hash(address: &str) -> Result<Uint160, AddressError> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|_| AddressError::InvalidEncoding(address.to_string()))?;

    if decoded.len() != ADDRESS_PAYLOAD_LEN {
        return Err(AddressError::InvalidLength(decoded.len()));
    }

    let (payload, checksum) = decoded.split_at(ADDRESS_PAYLOAD_LEN - CHECKSUM_LEN);
    if double_sha256(payload)[..CHECKSUM_LEN] != *checksum {
        return Err(AddressError::ChecksumMismatch);
    }
    if payload[0] != ADDRESS_VERSION {
        return Err(AddressError::InvalidVersion(payload[0]));
    }

    Uint160::from_slice(&payload[1..]).map_err(|_| AddressError::InvalidLength(decoded.len()))
}

impl Uint160 {
    /// Encode this program hash as an address
    pub fn to_address(&self) -> String {
        let mut bytes = Vec::with_capacity(ADDRESS_PAYLOAD_LEN);
        bytes.push(ADDRESS_VERSION);
        bytes.extend_from_slice(self.as_bytes());
        let checksum = double_sha256(&bytes);
        bytes.extend_from_slice(&checksum[..CHECKSUM_LEN]);
        bs58::encode(bytes).into_string()
    }
}

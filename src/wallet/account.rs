//! Wallet accounts
//!
//! An account is a key pair plus the program hash of its single-signature
//! contract. Coins paid to that hash belong to the account.

use crate::core::contract::{program_hash_of, signature_code};
use crate::core::uint::Uint160;
use crate::crypto::{KeyError, KeyPair};
use secp256k1::PublicKey;

/// A key-holding identity able to sign for its coins
#[derive(Debug, Clone)]
pub struct Account {
    key_pair: KeyPair,
    program_hash: Uint160,
}

impl Account {
    /// Create an account with a fresh key pair
    pub fn generate() -> Self {
        let key_pair = KeyPair::generate();
        let program_hash = Self::derive_program_hash(&key_pair.public_key);
        Self {
            key_pair,
            program_hash,
        }
    }

    /// Wrap an existing key pair
    pub fn from_key_pair(key_pair: KeyPair) -> Self {
        let program_hash = Self::derive_program_hash(&key_pair.public_key);
        Self {
            key_pair,
            program_hash,
        }
    }

    /// Import an account from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        Ok(Self::from_key_pair(KeyPair::from_private_key_hex(hex_key)?))
    }

    fn derive_program_hash(public_key: &PublicKey) -> Uint160 {
        program_hash_of(&signature_code(public_key))
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key_pair.public_key
    }

    /// Compressed public key bytes
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.key_pair.public_key.serialize()
    }

    /// Program hash of this account's signature contract
    pub fn program_hash(&self) -> Uint160 {
        self.program_hash
    }

    /// Address coins should be sent to
    pub fn address(&self) -> String {
        self.program_hash.to_address()
    }

    /// Private key as hex. Keep this secret!
    pub fn private_key_hex(&self) -> String {
        self.key_pair.private_key_hex()
    }
}

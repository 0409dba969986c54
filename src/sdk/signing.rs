//! Signing and contract collaborators
//!
//! The builder never touches key material or script layout directly; it
//! asks a [`SigningService`] for signatures and a [`ContractService`] for
//! verification scripts. The defaults sign with the account's secp256k1
//! key and build standard single-signature contracts.

use crate::core::contract::{self, Contract, ContractError};
use crate::crypto::{sha256, KeyError};
use crate::wallet::Account;
use thiserror::Error;

/// Error returned by a signing collaborator
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Signer unavailable: {0}")]
    Unavailable(String),
}

/// Produces signatures over a transaction's signable payload
pub trait SigningService {
    fn sign(&self, data: &[u8], account: &Account) -> Result<Vec<u8>, SigningError>;
}

/// Produces verification scripts for public keys
pub trait ContractService {
    fn create_signature_contract(&self, public_key: &[u8]) -> Result<Contract, ContractError>;
}

/// Signs the SHA-256 of the payload with the account's own key
#[derive(Debug, Default, Clone, Copy)]
pub struct KeySigner;

impl SigningService for KeySigner {
    fn sign(&self, data: &[u8], account: &Account) -> Result<Vec<u8>, SigningError> {
        Ok(account.key_pair().sign(&sha256(data))?)
    }
}

/// Standard single-signature contracts
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureContracts;

impl ContractService for SignatureContracts {
    fn create_signature_contract(&self, public_key: &[u8]) -> Result<Contract, ContractError> {
        contract::create_signature_contract(public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_signature;

    #[test]
    fn test_key_signer_signs_payload_digest() {
        let account = Account::generate();
        let payload = b"signable transaction bytes";
        let signature = KeySigner.sign(payload, &account).unwrap();
        assert!(verify_signature(account.public_key(), &sha256(payload), &signature).unwrap());
    }

    #[test]
    fn test_signature_contracts_match_account() {
        let account = Account::generate();
        let contract = SignatureContracts
            .create_signature_contract(&account.public_key_bytes())
            .unwrap();
        assert_eq!(contract.program_hash, account.program_hash());
    }
}

//! Signature contracts
//!
//! A single-signature contract locks value to one public key:
//!
//! ```text
//! code      = PUSH33 <compressed pubkey> CHECKSIG
//! parameter = PUSH64 <compact signature>
//! ```
//!
//! The contract's program hash is `hash160(code)`; outputs owned by a key
//! carry that hash.

use crate::core::uint::Uint160;
use crate::crypto::hash160;
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Opcodes
// =============================================================================

/// Push the next 33 bytes (a compressed public key)
pub const OP_PUSHBYTES33: u8 = 0x21;

/// Push the next 64 bytes (a compact signature)
pub const OP_PUSHBYTES64: u8 = 0x40;

/// Check a signature against the pushed public key
pub const OP_CHECKSIG: u8 = 0xac;

const PUBLIC_KEY_LEN: usize = 33;
const SIGNATURE_LEN: usize = 64;

// =============================================================================
// Errors
// =============================================================================

/// Contract construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Invalid public key for signature contract")]
    InvalidPublicKey,
    #[error("Invalid signature length: {0} bytes")]
    InvalidSignatureLength(usize),
    #[error("Code is not a single-signature contract")]
    NotSignatureContract,
}

// =============================================================================
// Contract
// =============================================================================

/// Kinds of parameter a verification program expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractParameterType {
    Signature,
    PublicKey,
    Hash160,
}

/// A verification script together with its program hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub code: Vec<u8>,
    pub parameters: Vec<ContractParameterType>,
    pub program_hash: Uint160,
}

impl Contract {
    /// Public key embedded in a single-signature contract
    pub fn public_key(&self) -> Result<PublicKey, ContractError> {
        public_key_from_code(&self.code)
    }
}

/// Single-signature verification code for a parsed key
pub fn signature_code(public_key: &PublicKey) -> Vec<u8> {
    let mut code = Vec::with_capacity(PUBLIC_KEY_LEN + 2);
    code.push(OP_PUSHBYTES33);
    code.extend_from_slice(&public_key.serialize());
    code.push(OP_CHECKSIG);
    code
}

/// Build the single-signature verification code for a compressed key
pub fn create_signature_redeem_script(public_key: &[u8]) -> Result<Vec<u8>, ContractError> {
    if public_key.len() != PUBLIC_KEY_LEN {
        return Err(ContractError::InvalidPublicKey);
    }
    let public_key =
        PublicKey::from_slice(public_key).map_err(|_| ContractError::InvalidPublicKey)?;
    Ok(signature_code(&public_key))
}

/// Create the signature contract for a serialized (compressed) public key
pub fn create_signature_contract(public_key: &[u8]) -> Result<Contract, ContractError> {
    let code = create_signature_redeem_script(public_key)?;
    let program_hash = Uint160::new(hash160(&code));
    Ok(Contract {
        code,
        parameters: vec![ContractParameterType::Signature],
        program_hash,
    })
}

/// Program hash of arbitrary verification code
pub fn program_hash_of(code: &[u8]) -> Uint160 {
    Uint160::new(hash160(code))
}

/// Wrap a compact signature as a verification parameter
pub fn signature_parameter(signature: &[u8]) -> Result<Vec<u8>, ContractError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(ContractError::InvalidSignatureLength(signature.len()));
    }
    let mut parameter = Vec::with_capacity(SIGNATURE_LEN + 1);
    parameter.push(OP_PUSHBYTES64);
    parameter.extend_from_slice(signature);
    Ok(parameter)
}

/// Extract the compact signature from a verification parameter
pub fn signature_from_parameter(parameter: &[u8]) -> Result<&[u8], ContractError> {
    match parameter.split_first() {
        Some((&OP_PUSHBYTES64, sig)) if sig.len() == SIGNATURE_LEN => Ok(sig),
        _ => Err(ContractError::InvalidSignatureLength(
            parameter.len().saturating_sub(1),
        )),
    }
}

/// Extract the public key from single-signature verification code
pub fn public_key_from_code(code: &[u8]) -> Result<PublicKey, ContractError> {
    if code.len() != PUBLIC_KEY_LEN + 2
        || code[0] != OP_PUSHBYTES33
        || code[PUBLIC_KEY_LEN + 1] != OP_CHECKSIG
    {
        return Err(ContractError::NotSignatureContract);
    }
    PublicKey::from_slice(&code[1..=PUBLIC_KEY_LEN]).map_err(|_| ContractError::InvalidPublicKey)
}

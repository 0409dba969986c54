//! Transaction data model
//!
//! Three transaction kinds are produced by the SDK: asset registration,
//! asset issuance and asset transfer. Inputs reference unspent outputs,
//! outputs carry an asset, a fixed-point value and the owning program
//! hash, and one verification program is attached per signer.

use crate::core::asset::Asset;
use crate::core::contract::{self, ContractError};
use crate::core::fixed::Fixed64;
use crate::core::uint::{Uint160, Uint256};
use crate::crypto::{double_sha256, sha256, verify_signature, KeyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Program {index} is malformed: {source}")]
    InvalidProgram {
        index: usize,
        #[source]
        source: ContractError,
    },
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Kind of transaction, also the key used in fee configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    RegisterAsset,
    IssueAsset,
    TransferAsset,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::RegisterAsset => "RegisterAsset",
            TransactionType::IssueAsset => "IssueAsset",
            TransactionType::TransferAsset => "TransferAsset",
        }
    }

    fn as_byte(&self) -> u8 {
        match self {
            TransactionType::RegisterAsset => 0x40,
            TransactionType::IssueAsset => 0x01,
            TransactionType::TransferAsset => 0x80,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Purpose of a transaction attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeUsage {
    /// Random value making otherwise identical transactions distinct
    Nonce,
    Description,
}

impl AttributeUsage {
    fn as_byte(&self) -> u8 {
        match self {
            AttributeUsage::Nonce => 0x00,
            AttributeUsage::Description => 0x90,
        }
    }
}

/// Free-form data attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxAttribute {
    pub usage: AttributeUsage,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl TxAttribute {
    pub fn new(usage: AttributeUsage, data: Vec<u8>) -> Self {
        Self { usage, data }
    }

    /// Nonce attribute holding the decimal text of `nonce`
    pub fn nonce(nonce: u64) -> Self {
        Self::new(AttributeUsage::Nonce, nonce.to_string().into_bytes())
    }
}

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// Reference to an unspent output of a previous transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtxoInput {
    /// Transaction ID of the previous transaction
    pub refer_tx_id: Uint256,
    /// Index of the output in the previous transaction
    pub refer_output_index: u16,
}

impl UtxoInput {
    pub fn new(refer_tx_id: Uint256, refer_output_index: u16) -> Self {
        Self {
            refer_tx_id,
            refer_output_index,
        }
    }
}

impl fmt::Display for UtxoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.refer_tx_id, self.refer_output_index)
    }
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub asset_id: Uint256,
    pub value: Fixed64,
    /// Program hash of the owner
    pub program_hash: Uint160,
}

impl TxOutput {
    pub fn new(asset_id: Uint256, value: Fixed64, program_hash: Uint160) -> Self {
        Self {
            asset_id,
            value,
            program_hash,
        }
    }
}

/// Verification program: the signer's script and its signature parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(with = "hex_bytes")]
    pub code: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub parameter: Vec<u8>,
}

impl Program {
    /// Program hash of the verification code
    pub fn program_hash(&self) -> Uint160 {
        contract::program_hash_of(&self.code)
    }
}

// =============================================================================
// Payload
// =============================================================================

/// Kind-specific transaction data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    RegisterAsset {
        asset: Asset,
        amount: Fixed64,
        /// Issuer public key (compressed, hex)
        issuer: String,
        /// Program hash allowed to issue the asset
        controller: Uint160,
    },
    IssueAsset,
    TransferAsset,
}

// =============================================================================
// Transaction
// =============================================================================

/// A transaction as produced by the builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_type: TransactionType,
    pub payload: Payload,
    pub attributes: Vec<TxAttribute>,
    pub inputs: Vec<UtxoInput>,
    pub outputs: Vec<TxOutput>,
    /// One program per signer, in signer order
    pub programs: Vec<Program>,
}

impl Transaction {
    /// Unsigned asset registration
    pub fn register_asset(asset: Asset, amount: Fixed64, issuer: String, controller: Uint160) -> Self {
        Self {
            tx_type: TransactionType::RegisterAsset,
            payload: Payload::RegisterAsset {
                asset,
                amount,
                issuer,
                controller,
            },
            attributes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            programs: Vec::new(),
        }
    }

    /// Unsigned issuance of the given outputs
    pub fn issue_asset(outputs: Vec<TxOutput>) -> Self {
        Self {
            tx_type: TransactionType::IssueAsset,
            payload: Payload::IssueAsset,
            attributes: Vec::new(),
            inputs: Vec::new(),
            outputs,
            programs: Vec::new(),
        }
    }

    /// Unsigned transfer spending `inputs` into `outputs`
    pub fn transfer_asset(inputs: Vec<UtxoInput>, outputs: Vec<TxOutput>) -> Self {
        Self {
            tx_type: TransactionType::TransferAsset,
            payload: Payload::TransferAsset,
            attributes: Vec::new(),
            inputs,
            outputs,
            programs: Vec::new(),
        }
    }

    /// Deterministic encoding of everything except the programs.
    /// This is the payload every signer signs.
    pub fn signable_data(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(self.tx_type.as_byte());

        if let Payload::RegisterAsset {
            asset,
            amount,
            issuer,
            controller,
        } = &self.payload
        {
            write_var_bytes(&mut buf, asset.name.as_bytes());
            write_var_bytes(&mut buf, asset.description.as_bytes());
            buf.push(asset.precision);
            buf.push(asset.asset_type as u8);
            buf.push(asset.record_type as u8);
            buf.extend_from_slice(&amount.raw().to_le_bytes());
            write_var_bytes(&mut buf, issuer.as_bytes());
            buf.extend_from_slice(controller.as_bytes());
        }

        write_var_uint(&mut buf, self.attributes.len() as u64);
        for attr in &self.attributes {
            buf.push(attr.usage.as_byte());
            write_var_bytes(&mut buf, &attr.data);
        }

        write_var_uint(&mut buf, self.inputs.len() as u64);
        for input in &self.inputs {
            buf.extend_from_slice(input.refer_tx_id.as_bytes());
            buf.extend_from_slice(&input.refer_output_index.to_le_bytes());
        }

        write_var_uint(&mut buf, self.outputs.len() as u64);
        for output in &self.outputs {
            buf.extend_from_slice(output.asset_id.as_bytes());
            buf.extend_from_slice(&output.value.raw().to_le_bytes());
            buf.extend_from_slice(output.program_hash.as_bytes());
        }

        buf
    }

    /// Transaction ID: double SHA-256 of the signable data
    pub fn hash(&self) -> Uint256 {
        let digest = double_sha256(&self.signable_data());
        let mut id = [0u8; 32];
        id.copy_from_slice(&digest);
        Uint256::new(id)
    }

    /// Sum of output values for one asset
    pub fn total_output(&self, asset_id: &Uint256) -> Option<Fixed64> {
        self.outputs
            .iter()
            .filter(|o| &o.asset_id == asset_id)
            .try_fold(Fixed64::ZERO, |acc, o| acc.checked_add(o.value))
    }

    /// Program hashes of the attached programs, in slot order
    pub fn program_hashes(&self) -> Vec<Uint160> {
        self.programs.iter().map(Program::program_hash).collect()
    }

    /// Check every program's signature against the signable data
    pub fn verify_signatures(&self) -> Result<bool, TransactionError> {
        if self.programs.is_empty() {
            return Ok(false);
        }

        let digest = sha256(&self.signable_data());
        for (index, program) in self.programs.iter().enumerate() {
            let public_key = contract::public_key_from_code(&program.code)
                .map_err(|source| TransactionError::InvalidProgram { index, source })?;
            let signature = contract::signature_from_parameter(&program.parameter)
                .map_err(|source| TransactionError::InvalidProgram { index, source })?;

            if !verify_signature(&public_key, &digest, signature)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

// =============================================================================
// Encoding helpers
// =============================================================================

fn write_var_uint(buf: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => buf.push(value as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
}

fn write_var_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_var_uint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Serde adapter rendering byte vectors as hex strings
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Errors surfaced by transaction construction
//!
//! Every failure aborts the whole build; the caller gets exactly one of
//! these and never a partially built transaction.

use crate::core::address::AddressError;
use crate::core::contract::ContractError;
use crate::core::fee::FeeError;
use crate::core::fixed::{Fixed64, FixedError};
use crate::core::transaction::UtxoInput;
use crate::core::uint::{Uint160, Uint256};
use thiserror::Error;

/// Transaction construction errors
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Invalid address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("Invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },
    #[error("Amount {value} does not cover the per-output fee {fee}")]
    FeeExceedsAmount { value: Fixed64, fee: Fixed64 },
    #[error("Insufficient funds: missing {missing}")]
    InsufficientFunds { missing: Fixed64 },
    #[error("Output carries asset {found}, expected {expected}")]
    AssetMismatch { expected: Uint256, found: Uint256 },
    #[error("No outputs specified")]
    NoOutputsSpecified,
    #[error("Wallet has no default account")]
    NoDefaultAccount,
    #[error("No wallet account for signer {0}")]
    UnknownSigner(Uint160),
    #[error("Input {0} is not a wallet coin")]
    UnknownInput(UtxoInput),
    #[error("Signing failed for {signer}: {reason}")]
    SigningFailure { signer: Uint160, reason: String },
    #[error("Contract creation failed: {0}")]
    ContractCreationFailure(#[from] ContractError),
    #[error("Invalid fee configuration: {0}")]
    InvalidFeeConfig(String),
    #[error("Verification slot {index} of {len} is empty")]
    IncompleteContext { index: usize, len: usize },
    #[error("Verification slot {index} out of range (context has {len})")]
    SlotOutOfRange { index: usize, len: usize },
}

impl BuildError {
    pub(crate) fn invalid_amount(value: &str, err: FixedError) -> Self {
        BuildError::InvalidAmount {
            value: value.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<FeeError> for BuildError {
    fn from(err: FeeError) -> Self {
        match err {
            FeeError::NoOutputs => BuildError::NoOutputsSpecified,
            FeeError::InvalidFeeConfig { .. } => BuildError::InvalidFeeConfig(err.to_string()),
        }
    }
}

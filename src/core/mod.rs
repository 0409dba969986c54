//! Core data model
//!
//! This module contains the fundamental building blocks:
//! - Fixed-point amounts
//! - Asset IDs, transaction IDs and program hashes
//! - Address encoding
//! - Transactions (register, issue, transfer)
//! - Signature contracts
//! - Fee calculation

pub mod address;
pub mod asset;
pub mod contract;
pub mod fee;
pub mod fixed;
pub mod transaction;
pub mod uint;

pub use address::{to_script_hash, AddressError, ADDRESS_VERSION};
pub use asset::{Asset, AssetType, RecordType, MAX_PRECISION};
pub use contract::{
    create_signature_contract, Contract, ContractError, ContractParameterType,
};
pub use fee::{FeeCalculator, FeeError, FeePolicy, FeeRate, DERIVE_FROM_SIZE};
pub use fixed::{Fixed64, FixedError, FIXED_PRECISION, FIXED_SCALE};
pub use transaction::{
    AttributeUsage, Payload, Program, Transaction, TransactionError, TransactionType,
    TxAttribute, TxOutput, UtxoInput,
};
pub use uint::{Uint160, Uint256, UintError};

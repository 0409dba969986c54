//! UTXO asset SDK: wallet-side construction of signed asset transactions
//!
//! This crate builds the three transaction kinds a wallet produces on a
//! UTXO asset chain:
//! - Asset registration, signed by the wallet's default account
//! - Asset issuance to caller-supplied outputs
//! - Multi-output asset transfer with smallest-first coin selection,
//!   per-output fees and a single change output
//! - Deterministic multi-signature assembly when spent coins have several
//!   owners (signers sorted by program hash, one verification slot each)
//! - Fixed-point amounts with 8 decimal places
//! - Base58Check addresses and JSON wallet persistence
//!
//! # Example
//!
//! ```rust
//! use utxo_asset_sdk::core::{TxOutput, Uint160, Uint256, UtxoInput};
//! use utxo_asset_sdk::sdk::{BatchOut, TransactionBuilder};
//! use utxo_asset_sdk::wallet::{Wallet, WalletClient};
//!
//! // Create a wallet and give it a coin
//! let mut wallet = Wallet::new();
//! let owner = wallet.default_account().unwrap().program_hash();
//! let asset = Uint256::new([1; 32]);
//! wallet
//!     .add_coin(
//!         UtxoInput::new(Uint256::new([2; 32]), 0),
//!         TxOutput::new(asset, "100".parse().unwrap(), owner),
//!     )
//!     .unwrap();
//!
//! // Pay 40 to another address
//! let to = Uint160::new([3; 20]).to_address();
//! let mut builder = TransactionBuilder::default();
//! let tx = builder
//!     .make_transfer_transaction(&wallet, &asset, &[BatchOut::new(&to, "40")])
//!     .unwrap();
//!
//! assert_eq!(tx.outputs.len(), 2);
//! assert!(tx.verify_signatures().unwrap());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod sdk;
pub mod wallet;

// Re-export commonly used types
pub use config::Config;
pub use crate::core::{Fixed64, Transaction, TxOutput, Uint160, Uint256, UtxoInput};
pub use crypto::KeyPair;
pub use sdk::{BatchOut, BuildError, TransactionBuilder};
pub use wallet::{Account, Wallet, WalletClient};

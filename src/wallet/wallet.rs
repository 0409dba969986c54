//! Wallet implementation
//!
//! Holds accounts and the coins they own, and exposes them to the
//! transaction builder through [`WalletClient`].

use crate::core::fixed::Fixed64;
use crate::core::transaction::{TxOutput, UtxoInput};
use crate::core::uint::{Uint160, Uint256};
use crate::crypto::KeyError;
use crate::wallet::account::Account;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Wallet-related errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet has no default account")]
    NoDefaultAccount,
    #[error("Account not found: {0}")]
    AccountNotFound(Uint160),
    #[error("Coin already recorded: {0}")]
    DuplicateCoin(UtxoInput),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
}

/// An unspent output owned by one of the wallet's accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub output: TxOutput,
}

impl Coin {
    pub fn new(output: TxOutput) -> Self {
        Self { output }
    }

    /// Program hash of the owning account
    pub fn owner(&self) -> Uint160 {
        self.output.program_hash
    }
}

/// What the transaction builder needs from a wallet
pub trait WalletClient {
    /// Account that registers, issues and receives change
    fn default_account(&self) -> Result<&Account, WalletError>;

    /// Every unspent coin the wallet owns
    fn coins(&self) -> &HashMap<UtxoInput, Coin>;

    /// Account whose signature contract hashes to `program_hash`
    fn account_by_program_hash(&self, program_hash: &Uint160) -> Option<&Account>;
}

/// Serializable wallet data for persistence
#[derive(Debug, Serialize, Deserialize)]
struct WalletData {
    label: Option<String>,
    default_account: Option<Uint160>,
    private_keys: Vec<String>,
    coins: Vec<CoinRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CoinRecord {
    input: UtxoInput,
    output: TxOutput,
}

/// In-memory wallet with JSON persistence
#[derive(Debug, Default)]
pub struct Wallet {
    accounts: HashMap<Uint160, Account>,
    default_account: Option<Uint160>,
    coins: HashMap<UtxoInput, Coin>,
    /// Optional label for the wallet
    pub label: Option<String>,
}

impl Wallet {
    /// Create a new wallet with a fresh default account
    pub fn new() -> Self {
        let mut wallet = Self::empty();
        let hash = wallet.create_account();
        wallet.default_account = Some(hash);
        wallet
    }

    /// Create a wallet with no accounts at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a wallet with a label
    pub fn with_label(label: &str) -> Self {
        let mut wallet = Self::new();
        wallet.label = Some(label.to_string());
        wallet
    }

    /// Generate a new account, returning its program hash
    pub fn create_account(&mut self) -> Uint160 {
        self.add_account(Account::generate())
    }

    /// Import an account from a hex-encoded private key
    pub fn import_account(&mut self, private_key_hex: &str) -> Result<Uint160, WalletError> {
        Ok(self.add_account(Account::from_private_key_hex(private_key_hex)?))
    }

    /// Add an account, returning its program hash
    pub fn add_account(&mut self, account: Account) -> Uint160 {
        let hash = account.program_hash();
        self.accounts.insert(hash, account);
        hash
    }

    /// Make an existing account the default one
    pub fn set_default_account(&mut self, program_hash: Uint160) -> Result<(), WalletError> {
        if !self.accounts.contains_key(&program_hash) {
            return Err(WalletError::AccountNotFound(program_hash));
        }
        self.default_account = Some(program_hash);
        Ok(())
    }

    /// All accounts, ordered by program hash
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|a| a.program_hash());
        accounts
    }

    /// Record an unspent output owned by this wallet
    pub fn add_coin(&mut self, input: UtxoInput, output: TxOutput) -> Result<(), WalletError> {
        if self.coins.contains_key(&input) {
            return Err(WalletError::DuplicateCoin(input));
        }
        self.coins.insert(input, Coin::new(output));
        Ok(())
    }

    /// Drop coins consumed by a transaction
    pub fn mark_spent(&mut self, inputs: &[UtxoInput]) {
        for input in inputs {
            if self.coins.remove(input).is_none() {
                log::warn!("Spent coin {} was not in the wallet", input);
            }
        }
    }

    /// Total unspent value of one asset, `None` on overflow
    pub fn balance(&self, asset_id: &Uint256) -> Option<Fixed64> {
        self.coins
            .values()
            .filter(|c| &c.output.asset_id == asset_id)
            .try_fold(Fixed64::ZERO, |acc, c| acc.checked_add(c.output.value))
    }

    /// Save wallet to file
    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let mut coins: Vec<CoinRecord> = self
            .coins
            .iter()
            .map(|(input, coin)| CoinRecord {
                input: *input,
                output: coin.output.clone(),
            })
            .collect();
        coins.sort_by_key(|c| c.input);

        let data = WalletData {
            label: self.label.clone(),
            default_account: self.default_account,
            private_keys: self.accounts().iter().map(|a| a.private_key_hex()).collect(),
            coins,
        };

        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load wallet from file
    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let json = fs::read_to_string(path)?;
        let data: WalletData = serde_json::from_str(&json)?;

        let mut wallet = Self::empty();
        wallet.label = data.label;
        for key in &data.private_keys {
            wallet.import_account(key)?;
        }
        if let Some(hash) = data.default_account {
            wallet.set_default_account(hash)?;
        }
        for record in data.coins {
            wallet.add_coin(record.input, record.output)?;
        }
        Ok(wallet)
    }
}

impl WalletClient for Wallet {
    fn default_account(&self) -> Result<&Account, WalletError> {
        self.default_account
            .and_then(|hash| self.accounts.get(&hash))
            .ok_or(WalletError::NoDefaultAccount)
    }

    fn coins(&self) -> &HashMap<UtxoInput, Coin> {
        &self.coins
    }

    fn account_by_program_hash(&self, program_hash: &Uint160) -> Option<&Account> {
        self.accounts.get(program_hash)
    }
}

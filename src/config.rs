//! SDK configuration
//!
//! Loaded from a JSON file such as:
//!
//! ```json
//! {
//!   "transaction_fee": { "TransferAsset": 0.01 },
//!   "fee_rate_per_byte": "0.00001"
//! }
//! ```

use crate::core::transaction::TransactionType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Fee settings consulted while building transactions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Total fee per transaction kind; `-1` derives the fee from size
    #[serde(default)]
    pub transaction_fee: HashMap<String, f64>,
    /// Rate used by size-derived fees, as decimal text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_rate_per_byte: Option<String>,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let file = fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Configured fee for a transaction kind. The short names `Register`,
    /// `Issue` and `Transfer` are accepted as well.
    pub fn fee_for(&self, kind: TransactionType) -> Option<f64> {
        let alias = match kind {
            TransactionType::RegisterAsset => "Register",
            TransactionType::IssueAsset => "Issue",
            TransactionType::TransferAsset => "Transfer",
        };
        self.transaction_fee
            .get(kind.as_str())
            .or_else(|| self.transaction_fee.get(alias))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_lookup_with_alias() {
        let mut config = Config::default();
        config.transaction_fee.insert("Transfer".to_string(), 0.5);
        assert_eq!(config.fee_for(TransactionType::TransferAsset), Some(0.5));
        assert_eq!(config.fee_for(TransactionType::IssueAsset), None);

        config.transaction_fee.insert("TransferAsset".to_string(), 2.0);
        assert_eq!(config.fee_for(TransactionType::TransferAsset), Some(2.0));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{ "transaction_fee": { "TransferAsset": -1 }, "fee_rate_per_byte": "0.001" }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.fee_for(TransactionType::TransferAsset), Some(-1.0));
        assert_eq!(config.fee_rate_per_byte.as_deref(), Some("0.001"));

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert!(empty.transaction_fee.is_empty());
    }

    #[test]
    fn test_save_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = Config::default();
        config.transaction_fee.insert("TransferAsset".to_string(), 0.01);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.fee_for(TransactionType::TransferAsset), Some(0.01));

        let missing = Config::load_or_default(&temp_dir.path().join("nope.json")).unwrap();
        assert!(missing.transaction_fee.is_empty());
    }
}

//! Asset descriptions carried by registration transactions

use serde::{Deserialize, Serialize};

/// Highest number of decimal places an asset may declare
pub const MAX_PRECISION: u8 = 8;

/// What kind of value an asset represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    Currency,
    Share,
    Invoice,
    Token,
}

/// How balances of the asset are recorded on chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    Utxo,
    Balance,
}

/// Asset metadata, immutable after registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub description: String,
    pub precision: u8,
    pub asset_type: AssetType,
    pub record_type: RecordType,
}

impl Asset {
    /// A UTXO-recorded token at full precision, described by its own name
    pub fn token(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: name.to_string(),
            precision: MAX_PRECISION,
            asset_type: AssetType::Token,
            record_type: RecordType::Utxo,
        }
    }
}

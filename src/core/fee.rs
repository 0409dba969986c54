//! Transaction fee calculation
//!
//! Fees are configured per transaction kind. A configured number is the
//! total fee for the transaction, split evenly across its requested
//! outputs. The value `-1` asks for a size-derived fee instead:
//! `fee_rate_per_byte × estimated size`.

use crate::config::Config;
use crate::core::fixed::Fixed64;
use crate::core::transaction::TransactionType;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Configured fee value meaning "derive the fee from transaction size"
pub const DERIVE_FROM_SIZE: f64 = -1.0;

/// Decimal places kept when reading a configured fee
pub const FEE_CONFIG_PRECISION: usize = 4;

/// Fixed overhead: type, payload tag, counts, one nonce attribute
pub const BASE_TX_SIZE: usize = 64;

/// Asset ID, value and program hash
pub const OUTPUT_SIZE: usize = 60;

/// Previous transaction ID and output index, with length prefix
pub const INPUT_SIZE: usize = 34;

/// Single-signature code plus signature parameter
pub const PROGRAM_SIZE: usize = 104;

// =============================================================================
// Errors
// =============================================================================

/// Fee calculation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("Invalid fee configuration for {kind}: {reason}")]
    InvalidFeeConfig { kind: String, reason: String },
    #[error("Fee requested for zero outputs")]
    NoOutputs,
}

// =============================================================================
// Fee Rate
// =============================================================================

/// Fee charged per byte of transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeeRate(pub Fixed64);

impl FeeRate {
    /// Calculate fee for a given size
    pub fn fee_for_size(&self, size_bytes: usize) -> Option<Fixed64> {
        let size = i64::try_from(size_bytes).ok()?;
        self.0.checked_mul_int(size)
    }
}

/// Size estimate for a transaction with `output_count` outputs.
///
/// The fee is priced before coin selection, so the estimate always counts
/// exactly one input and one program. A transfer that spends several coins
/// or needs several signers is larger than this.
pub fn estimated_size(output_count: usize) -> usize {
    BASE_TX_SIZE + output_count * OUTPUT_SIZE + INPUT_SIZE + PROGRAM_SIZE
}

// =============================================================================
// Fee Calculator
// =============================================================================

/// How the configuration prices one transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePolicy {
    /// No fee configured
    Free,
    /// Configured total fee
    Fixed(Fixed64),
    /// Fee derived from estimated size at the given rate
    BySize(FeeRate),
}

/// Derives per-output fees from configuration
#[derive(Debug, Clone, Default)]
pub struct FeeCalculator {
    config: Config,
}

impl FeeCalculator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Calculator that never charges
    pub fn free() -> Self {
        Self::default()
    }

    /// Resolve the configured policy for a transaction kind
    pub fn policy(&self, kind: TransactionType) -> Result<FeePolicy, FeeError> {
        let invalid = |reason: String| FeeError::InvalidFeeConfig {
            kind: kind.to_string(),
            reason,
        };

        let Some(value) = self.config.fee_for(kind) else {
            return Ok(FeePolicy::Free);
        };

        if value == DERIVE_FROM_SIZE {
            let rate = self
                .config
                .fee_rate_per_byte
                .as_deref()
                .ok_or_else(|| invalid("size-derived fee needs fee_rate_per_byte".to_string()))?;
            let rate: Fixed64 = rate
                .parse()
                .map_err(|e| invalid(format!("fee_rate_per_byte: {}", e)))?;
            if rate.raw() < 0 {
                return Err(invalid("fee_rate_per_byte is negative".to_string()));
            }
            return Ok(FeePolicy::BySize(FeeRate(rate)));
        }

        if !value.is_finite() || value < 0.0 {
            return Err(invalid(format!("{} is not a valid fee", value)));
        }

        let text = format!("{:.*}", FEE_CONFIG_PRECISION, value);
        let fee: Fixed64 = text.parse().map_err(|e| invalid(format!("{}", e)))?;
        Ok(FeePolicy::Fixed(fee))
    }

    /// Total fee for a transaction of `kind` with `output_count` outputs
    pub fn total_fee(&self, kind: TransactionType, output_count: usize) -> Result<Fixed64, FeeError> {
        match self.policy(kind)? {
            FeePolicy::Free => Ok(Fixed64::ZERO),
            FeePolicy::Fixed(fee) => Ok(fee),
            FeePolicy::BySize(rate) => {
                let size = estimated_size(output_count);
                rate.fee_for_size(size).ok_or_else(|| FeeError::InvalidFeeConfig {
                    kind: kind.to_string(),
                    reason: format!("fee for {} bytes overflows", size),
                })
            }
        }
    }

    /// Fee charged to each of `output_count` requested outputs
    pub fn per_output_fee(
        &self,
        kind: TransactionType,
        output_count: usize,
    ) -> Result<Fixed64, FeeError> {
        if output_count == 0 {
            return Err(FeeError::NoOutputs);
        }
        let total = self.total_fee(kind, output_count)?;
        let fee = total.div_count(output_count).ok_or(FeeError::NoOutputs)?;
        log::debug!(
            "{} fee {} split over {} output(s): {} each",
            kind,
            total,
            output_count,
            fee
        );
        Ok(fee)
    }
}

// =============================================================================
// Tests
// =============================================================================

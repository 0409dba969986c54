//! Coin selection
//!
//! Picks the wallet coins that fund a set of payments. Coins of the
//! requested asset are consumed smallest first, so dust gets swept into
//! transfers instead of piling up in the wallet. Selection stops at the
//! first coin that meets the remaining requirement; any surplus from that
//! coin becomes a single change output appended after the payments.

use crate::core::fixed::Fixed64;
use crate::core::transaction::{TxOutput, UtxoInput};
use crate::core::uint::{Uint160, Uint256};
use crate::sdk::error::BuildError;
use crate::wallet::Coin;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A decoded payment request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    /// Program hash the destination address decodes to
    pub program_hash: Uint160,
    /// Gross amount, fee included
    pub value: Fixed64,
}

impl Payment {
    pub fn new(program_hash: Uint160, value: Fixed64) -> Self {
        Self {
            program_hash,
            value,
        }
    }
}

/// Inputs and outputs chosen for a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Spent coins, in consumption order
    pub inputs: Vec<UtxoInput>,
    /// Payment outputs in request order, then change if any
    pub outputs: Vec<TxOutput>,
    /// Sum of the spent coins
    pub total_input: Fixed64,
    has_change: bool,
}

impl Selection {
    /// The change output, always the last output when present
    pub fn change(&self) -> Option<&TxOutput> {
        if self.has_change {
            self.outputs.last()
        } else {
            None
        }
    }
}

/// Coins of `asset_id`, ascending by value. Equal values fall back to the
/// input reference so the order never depends on map iteration.
pub fn sorted_coins<'a>(
    coins: &'a HashMap<UtxoInput, Coin>,
    asset_id: &Uint256,
) -> Vec<(&'a UtxoInput, &'a Coin)> {
    let mut candidates: Vec<(&UtxoInput, &Coin)> = coins
        .iter()
        .filter(|(_, coin)| &coin.output.asset_id == asset_id)
        .collect();
    candidates.sort_by(|(a_in, a), (b_in, b)| {
        a.output
            .value
            .cmp(&b.output.value)
            .then_with(|| a_in.cmp(b_in))
    });
    candidates
}

/// Select coins of `asset_id` to fund `payments`, each of which pays
/// `per_output_fee`. Change goes to `change_to`.
pub fn select_coins(
    coins: &HashMap<UtxoInput, Coin>,
    asset_id: &Uint256,
    payments: &[Payment],
    per_output_fee: Fixed64,
    change_to: Uint160,
) -> Result<Selection, BuildError> {
    if payments.is_empty() {
        return Err(BuildError::NoOutputsSpecified);
    }

    let overflow = || BuildError::InvalidAmount {
        value: "total".to_string(),
        reason: "sum of amounts overflows".to_string(),
    };

    let mut expected = Fixed64::ZERO;
    let mut outputs = Vec::with_capacity(payments.len() + 1);
    for payment in payments {
        if payment.value <= per_output_fee {
            return Err(BuildError::FeeExceedsAmount {
                value: payment.value,
                fee: per_output_fee,
            });
        }
        expected = expected.checked_add(payment.value).ok_or_else(overflow)?;
        let net = payment
            .value
            .checked_sub(per_output_fee)
            .ok_or_else(overflow)?;
        outputs.push(TxOutput::new(*asset_id, net, payment.program_hash));
    }

    let mut inputs = Vec::new();
    let mut total_input = Fixed64::ZERO;
    let mut has_change = false;

    for (input, coin) in sorted_coins(coins, asset_id) {
        let value = coin.output.value;
        inputs.push(*input);
        total_input = total_input.checked_add(value).ok_or_else(overflow)?;

        match value.cmp(&expected) {
            Ordering::Greater => {
                let change = value.checked_sub(expected).ok_or_else(overflow)?;
                outputs.push(TxOutput::new(*asset_id, change, change_to));
                has_change = true;
                expected = Fixed64::ZERO;
                break;
            }
            Ordering::Equal => {
                expected = Fixed64::ZERO;
                break;
            }
            Ordering::Less => {
                expected = expected.checked_sub(value).ok_or_else(overflow)?;
            }
        }
    }

    if expected.is_positive() {
        return Err(BuildError::InsufficientFunds { missing: expected });
    }

    log::debug!(
        "Selected {} coin(s) worth {} for {} payment(s){}",
        inputs.len(),
        total_input,
        payments.len(),
        if has_change { " with change" } else { "" }
    );

    Ok(Selection {
        inputs,
        outputs,
        total_input,
        has_change,
    })
}

// =============================================================================
// Tests
// =============================================================================

//! CLI commands for the asset SDK
//!
//! Implements the command handlers behind `assetctl`.

use crate::config::Config;
use crate::core::address::to_script_hash;
use crate::core::fee::FeeCalculator;
use crate::core::transaction::{Transaction, TxOutput, UtxoInput};
use crate::core::uint::Uint256;
use crate::sdk::{parse_amount, BatchOut, TransactionBuilder};
use crate::wallet::{Wallet, WalletClient};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub wallet: Wallet,
    pub wallet_path: PathBuf,
    pub builder: TransactionBuilder,
}

impl AppState {
    /// Load the wallet file and fee configuration
    pub fn new(wallet_path: PathBuf, config_path: &Path) -> CliResult<Self> {
        if !wallet_path.exists() {
            return Err(format!(
                "no wallet at {:?}, create one with: assetctl wallet new",
                wallet_path
            )
            .into());
        }
        let wallet = Wallet::load(&wallet_path)?;
        let config = Config::load_or_default(config_path)?;

        Ok(Self {
            wallet,
            wallet_path,
            builder: TransactionBuilder::new(FeeCalculator::new(config)),
        })
    }

    /// Save the wallet
    pub fn save(&self) -> CliResult<()> {
        self.wallet.save(&self.wallet_path)?;
        Ok(())
    }
}

/// Create a new wallet file
pub fn cmd_wallet_new(wallet_path: &Path, label: Option<&str>) -> CliResult<()> {
    if wallet_path.exists() {
        println!("⚠️  Wallet already exists at {:?}", wallet_path);
        return Ok(());
    }

    let wallet = match label {
        Some(l) => Wallet::with_label(l),
        None => Wallet::new(),
    };
    wallet.save(wallet_path)?;

    let account = wallet.default_account()?;
    println!("🔐 New wallet created!");
    println!("   📍 Address: {}", account.address());
    println!("   🔑 Public Key: {}", account.key_pair().public_key_hex());
    if let Some(l) = &wallet.label {
        println!("   🏷️  Label: {}", l);
    }
    println!("\n   ⚠️  IMPORTANT: Your private key is stored in {:?}.", wallet_path);
    println!("   Back up this file to avoid losing access to your funds!");

    Ok(())
}

/// Show accounts and balances
pub fn cmd_wallet_show(state: &AppState) -> CliResult<()> {
    let wallet = &state.wallet;
    let default = wallet.default_account().ok().map(|a| a.program_hash());

    println!("👛 Wallet {}", wallet.label.as_deref().unwrap_or("-"));
    println!("   Accounts:");
    for account in wallet.accounts() {
        let marker = if Some(account.program_hash()) == default {
            " (default)"
        } else {
            ""
        };
        println!("   ├─ {}{}", account.address(), marker);
    }

    let assets: BTreeMap<Uint256, usize> =
        wallet
            .coins()
            .values()
            .fold(BTreeMap::new(), |mut acc, coin| {
                *acc.entry(coin.output.asset_id).or_insert(0) += 1;
                acc
            });

    if assets.is_empty() {
        println!("   📭 No coins");
        return Ok(());
    }

    println!("   Balances:");
    for (asset_id, count) in &assets {
        let balance = wallet
            .balance(asset_id)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "overflow".to_string());
        println!("   ├─ {}: {} ({} coin(s))", asset_id, balance, count);
    }

    Ok(())
}

/// Record an unspent output the wallet owns
pub fn cmd_wallet_add_coin(
    state: &mut AppState,
    tx: &str,
    index: u16,
    asset: &str,
    value: &str,
    owner: Option<&str>,
) -> CliResult<()> {
    let input = UtxoInput::new(tx.parse()?, index);
    let asset_id: Uint256 = asset.parse()?;
    let value = parse_amount(value)?;
    let owner = match owner {
        Some(address) => to_script_hash(address)?,
        None => state.wallet.default_account()?.program_hash(),
    };

    state
        .wallet
        .add_coin(input, TxOutput::new(asset_id, value, owner))?;
    state.save()?;

    println!("🪙 Coin {} recorded: {} of {}", input, value, asset_id);
    Ok(())
}

/// Build an asset registration
pub fn cmd_register(state: &mut AppState, name: &str, supply: &str) -> CliResult<()> {
    let tx = state
        .builder
        .make_register_transaction(&state.wallet, name, supply)?;

    println!("📜 Register transaction for '{}' ({} units):", name, supply);
    print_transaction(&tx)
}

/// Build an issuance to one address
pub fn cmd_issue(state: &mut AppState, asset: &str, to: &str, value: &str) -> CliResult<()> {
    let asset_id: Uint256 = asset.parse()?;
    let tx = state
        .builder
        .make_issue_to(&state.wallet, &asset_id, to, value)?;

    println!("🏭 Issue transaction: {} of {} to {}", value, asset_id, to);
    print_transaction(&tx)
}

/// Build a transfer and drop the spent coins from the wallet
pub fn cmd_transfer(state: &mut AppState, asset: &str, to: &[String]) -> CliResult<()> {
    let asset_id: Uint256 = asset.parse()?;
    let batch = to
        .iter()
        .map(|arg| parse_payment(arg))
        .collect::<CliResult<Vec<_>>>()?;

    let tx = state
        .builder
        .make_transfer_transaction(&state.wallet, &asset_id, &batch)?;

    println!("📤 Transfer transaction:");
    for out in &batch {
        println!("   → {} : {}", out.address, out.value);
    }
    print_transaction(&tx)?;

    state.wallet.mark_spent(&tx.inputs);
    state.save()?;
    println!("\n✅ {} coin(s) marked as spent", tx.inputs.len());

    Ok(())
}

/// Parse an `ADDRESS=VALUE` payment argument
pub fn parse_payment(arg: &str) -> CliResult<BatchOut> {
    let (address, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ADDRESS=VALUE, got {:?}", arg))?;
    Ok(BatchOut::new(address.trim(), value.trim()))
}

fn print_transaction(tx: &Transaction) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(tx)?);
    println!("   ├─ Hash: {}", tx.hash());
    println!(
        "   └─ Signatures: {}",
        if tx.verify_signatures()? {
            "valid"
        } else {
            "INVALID"
        }
    );
    Ok(())
}

//! assetctl: command-line front end for the UTXO asset SDK
//!
//! Builds signed register, issue and transfer transactions against a JSON
//! wallet file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use utxo_asset_sdk::cli::{self, AppState};

#[derive(Parser)]
#[command(name = "assetctl")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Build signed UTXO asset transactions", long_about = None)]
struct Cli {
    /// Wallet file
    #[arg(short, long, default_value = "wallet.json")]
    wallet: PathBuf,

    /// Fee configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Register a new asset
    Register {
        /// Asset name
        #[arg(short, long)]
        name: String,

        /// Total supply
        #[arg(short, long)]
        supply: String,
    },

    /// Issue units of an asset to an address
    Issue {
        /// Asset ID (hex)
        #[arg(short, long)]
        asset: String,

        /// Recipient address
        #[arg(short, long)]
        to: String,

        /// Amount to issue
        #[arg(short, long)]
        value: String,
    },

    /// Transfer an asset to one or more addresses
    Transfer {
        /// Asset ID (hex)
        #[arg(short, long)]
        asset: String,

        /// Payment as ADDRESS=VALUE (repeatable)
        #[arg(short, long, required = true, num_args = 1..)]
        to: Vec<String>,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a new wallet
    New {
        /// Optional label for the wallet
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Show accounts and balances
    Show,

    /// Record an unspent output owned by the wallet
    AddCoin {
        /// Transaction ID holding the output (hex)
        #[arg(long)]
        tx: String,

        /// Output index within that transaction
        #[arg(long)]
        index: u16,

        /// Asset ID (hex)
        #[arg(long)]
        asset: String,

        /// Output value
        #[arg(long)]
        value: String,

        /// Owner address (defaults to the default account)
        #[arg(long)]
        owner: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Wallet creation doesn't need an existing wallet
    if let Commands::Wallet {
        action: WalletCommands::New { label },
    } = &cli.command
    {
        return cli::cmd_wallet_new(&cli.wallet, label.as_deref());
    }

    let mut state = AppState::new(cli.wallet.clone(), &cli.config)?;

    match cli.command {
        Commands::Wallet { action } => match action {
            WalletCommands::New { .. } => unreachable!(),
            WalletCommands::Show => {
                cli::cmd_wallet_show(&state)?;
            }
            WalletCommands::AddCoin {
                tx,
                index,
                asset,
                value,
                owner,
            } => {
                cli::cmd_wallet_add_coin(&mut state, &tx, index, &asset, &value, owner.as_deref())?;
            }
        },

        Commands::Register { name, supply } => {
            cli::cmd_register(&mut state, &name, &supply)?;
        }

        Commands::Issue { asset, to, value } => {
            cli::cmd_issue(&mut state, &asset, &to, &value)?;
        }

        Commands::Transfer { asset, to } => {
            cli::cmd_transfer(&mut state, &asset, &to)?;
        }
    }

    Ok(())
}

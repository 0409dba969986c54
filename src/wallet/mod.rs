//! Wallet module: accounts, owned coins and the client interface the
//! transaction builder consumes

pub mod account;
pub mod wallet;

pub use account::Account;
pub use wallet::{Coin, Wallet, WalletClient, WalletError};

//! Transaction construction
//!
//! Coin selection, signer resolution, verification context assembly and
//! the builder that drives them.

pub mod builder;
pub mod context;
pub mod error;
pub mod nonce;
pub mod selection;
pub mod signers;
pub mod signing;

pub use builder::{parse_amount, BatchOut, TransactionBuilder};
pub use context::{build_context, ContractContext};
pub use error::BuildError;
pub use nonce::{FixedNonce, NonceSource, RandomNonce};
pub use selection::{select_coins, sorted_coins, Payment, Selection};
pub use signers::{owner_hashes, resolve_signers};
pub use signing::{ContractService, KeySigner, SignatureContracts, SigningError, SigningService};

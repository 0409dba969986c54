//! Nonce generation for transaction uniqueness
//!
//! The nonce only keeps otherwise identical transactions from sharing a
//! hash. It carries no security weight, so any source works as long as it
//! rarely repeats.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the value for a transaction's nonce attribute
pub trait NonceSource {
    fn next_nonce(&mut self) -> u64;
}

/// Random non-negative 63-bit nonces
#[derive(Debug)]
pub struct RandomNonce {
    rng: StdRng,
}

impl RandomNonce {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence, for tests and fixtures
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for RandomNonce {
    fn next_nonce(&mut self) -> u64 {
        self.rng.gen_range(0..=i64::MAX as u64)
    }
}

/// Always returns the same nonce
#[derive(Debug, Clone, Copy)]
pub struct FixedNonce(pub u64);

impl NonceSource for FixedNonce {
    fn next_nonce(&mut self) -> u64 {
        self.0
    }
}

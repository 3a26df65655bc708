//! Escrow Crypto - Hashing and address derivation
//!
//! This crate provides:
//! - Hashing (SHA-256)
//! - One-way derivation of module and module-owned addresses
//! - Module credentials installed on derived accounts
//!
//! # Security Invariant
//!
//! **Derived addresses have no private key.** Only the owning module can act
//! for them; no external signature can ever authorize an action as one.

pub mod hash;
pub mod derive;

pub use hash::*;
pub use derive::*;

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid derivation input: {0}")]
    InvalidDerivation(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

impl From<CryptoError> for escrow_types::EscrowError {
    fn from(e: CryptoError) -> Self {
        escrow_types::EscrowError::invariant(e.to_string())
    }
}

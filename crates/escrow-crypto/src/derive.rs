//! Module address derivation
//!
//! A module owns a base address (`module_address`) and can derive any number
//! of sub-accounts from it (`derive_address`). The derivation is one way:
//! knowing a derived address reveals nothing about which key produced it,
//! and nobody holds a private key for it.

use serde::{Deserialize, Serialize};

use escrow_types::Address;

use crate::hash::{sha256, typed_hash};
use crate::{CryptoError, CryptoResult};

/// Length of a plain module address
pub const MODULE_ADDRESS_LEN: usize = 20;

const MODULE_TYPE: &str = "module";

/// Base address of a module, derived from its name alone
pub fn module_address(name: &str) -> Address {
    let hash = sha256(name.as_bytes());
    Address::new(hash[..MODULE_ADDRESS_LEN].to_vec())
}

/// Address of the sub-account `derivation_key` of module `name`
///
/// The module name is NUL-terminated inside the preimage so that
/// `("ab", "c")` and `("a", "bc")` never collide.
pub fn derive_address(name: &str, derivation_key: &[u8]) -> CryptoResult<Address> {
    if name.is_empty() {
        return Err(CryptoError::InvalidDerivation("empty module name".to_string()));
    }
    if name.as_bytes().contains(&0) {
        return Err(CryptoError::InvalidDerivation(
            "module name contains NUL".to_string(),
        ));
    }
    let mut preimage = Vec::with_capacity(name.len() + 1 + derivation_key.len());
    preimage.extend_from_slice(name.as_bytes());
    preimage.push(0);
    preimage.extend_from_slice(derivation_key);
    Ok(Address::from(typed_hash(MODULE_TYPE, &preimage)))
}

/// Derivation key for the `sequence`-th value under `tag`
pub fn sequence_key(tag: &[u8], sequence: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(tag.len() + 8);
    key.extend_from_slice(tag);
    key.extend_from_slice(&sequence.to_be_bytes());
    key
}

/// Authentication credential installed on a module-derived account
///
/// It carries no secret: the account can only be driven by the module whose
/// name and key reproduce its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCredential {
    pub module_name: String,
    pub derivation_key: Vec<u8>,
}

impl ModuleCredential {
    pub fn new(module_name: impl Into<String>, derivation_key: Vec<u8>) -> CryptoResult<Self> {
        let credential = Self {
            module_name: module_name.into(),
            derivation_key,
        };
        // fail early on inputs that cannot produce an address
        credential.address()?;
        Ok(credential)
    }

    /// Address this credential authenticates
    pub fn address(&self) -> CryptoResult<Address> {
        derive_address(&self.module_name, &self.derivation_key)
    }

    /// Check the credential reproduces `address`
    pub fn verify(&self, address: &Address) -> bool {
        matches!(self.address(), Ok(derived) if &derived == address)
    }
}

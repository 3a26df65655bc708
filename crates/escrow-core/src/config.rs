//! Module configuration

use serde::{Deserialize, Serialize};

use escrow_types::{EscrowError, Result, MODULE_NAME};

/// Default bound on derivation attempts per `create_agent`
pub const DEFAULT_MAX_ADDRESS_ATTEMPTS: u32 = 1024;

/// Name of the module whose address is the default governance authority
pub const GOV_MODULE_NAME: &str = "gov";

/// Escrow module configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Module identity; seeds agent address derivation and store prefixes
    pub module_name: String,
    /// Prefix of the string form of addresses
    pub address_prefix: String,
    /// Encoded address allowed to update params; `None` means the
    /// governance module address
    pub authority: Option<String>,
    /// Derivation attempts before `create_agent` gives up
    pub max_address_attempts: u32,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            module_name: MODULE_NAME.to_string(),
            address_prefix: MODULE_NAME.to_string(),
            authority: None,
            max_address_attempts: DEFAULT_MAX_ADDRESS_ATTEMPTS,
        }
    }
}

impl EscrowConfig {
    /// Create config from environment variables, defaulting what is unset
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            module_name: lookup("ESCROW_MODULE_NAME").unwrap_or(defaults.module_name),
            address_prefix: lookup("ESCROW_ADDRESS_PREFIX").unwrap_or(defaults.address_prefix),
            authority: lookup("ESCROW_AUTHORITY").filter(|s| !s.is_empty()),
            max_address_attempts: lookup("ESCROW_MAX_ADDRESS_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_address_attempts),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_name.is_empty() {
            return Err(EscrowError::invalid_input("module_name", "must not be empty"));
        }
        if self.module_name.contains(|c: char| c == '/' || c == '\0') {
            return Err(EscrowError::invalid_input(
                "module_name",
                "must not contain '/' or NUL",
            ));
        }
        if self.address_prefix.is_empty() {
            return Err(EscrowError::invalid_input("address_prefix", "must not be empty"));
        }
        if self.max_address_attempts == 0 {
            return Err(EscrowError::invalid_input(
                "max_address_attempts",
                "must be positive",
            ));
        }
        Ok(())
    }
}

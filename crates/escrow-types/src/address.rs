//! Identity types for the escrow module
//!
//! Internally every identity is raw bytes. The string form only exists at
//! the outer boundary and is produced by an [`AddressCodec`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{EscrowError, Result};

/// Longest identity the store can key on
pub const MAX_ADDRESS_LEN: usize = 255;

/// Raw account identity
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(Vec<u8>);

impl Address {
    /// Wrap raw identity bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Non-empty and within [`MAX_ADDRESS_LEN`]
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.len() <= MAX_ADDRESS_LEN
    }

    /// Lowercase hex of the raw bytes
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse lowercase or uppercase hex
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        Ok(Self(hex::decode(s)?))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<Vec<u8>> for Address {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Persisted and exported as hex so genesis documents stay readable.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Converts identities to and from their external string form
pub trait AddressCodec: Send + Sync {
    fn encode(&self, address: &Address) -> Result<String>;

    fn decode(&self, s: &str) -> Result<Address>;
}

/// `<prefix>_<hex>` codec, the default string form of an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedHexCodec {
    prefix: String,
}

impl PrefixedHexCodec {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixedHexCodec {
    fn default() -> Self {
        Self::new(crate::MODULE_NAME)
    }
}

impl AddressCodec for PrefixedHexCodec {
    fn encode(&self, address: &Address) -> Result<String> {
        if address.is_empty() {
            return Err(EscrowError::invalid_address("", "empty address"));
        }
        Ok(format!("{}_{}", self.prefix, address.to_hex()))
    }

    fn decode(&self, s: &str) -> Result<Address> {
        if s.is_empty() {
            return Err(EscrowError::invalid_address(s, "empty address string"));
        }
        let payload = s
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .ok_or_else(|| {
                EscrowError::invalid_address(s, format!("expected prefix '{}_'", self.prefix))
            })?;
        if payload.is_empty() {
            return Err(EscrowError::invalid_address(s, "empty payload"));
        }
        let address =
            Address::from_hex(payload).map_err(|e| EscrowError::invalid_address(s, e.to_string()))?;
        if address.len() > MAX_ADDRESS_LEN {
            return Err(EscrowError::invalid_address(
                s,
                format!("{} bytes exceeds {}", address.len(), MAX_ADDRESS_LEN),
            ));
        }
        Ok(address)
    }
}

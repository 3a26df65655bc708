//! Governance parameters

use serde::{Deserialize, Serialize};

use crate::error::{EscrowError, Result};

/// Default cap on the proposal metadata string
pub const DEFAULT_MAX_METADATA_LENGTH: u64 = 255;

/// Singleton governance value, only the authority may change it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Longest metadata string accepted on submission
    pub max_metadata_length: u64,
}

impl Params {
    pub fn new(max_metadata_length: u64) -> Self {
        Self {
            max_metadata_length,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_metadata_length == 0 {
            return Err(EscrowError::InvalidParams {
                reason: "max_metadata_length must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Check a metadata string against the configured cap
    pub fn check_metadata(&self, metadata: &str) -> Result<()> {
        let length = metadata.len();
        if length as u64 > self.max_metadata_length {
            return Err(EscrowError::MetadataTooLong {
                length,
                max: self.max_metadata_length,
            });
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_METADATA_LENGTH)
    }
}

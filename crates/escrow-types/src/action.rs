//! Opaque actions and the typed messages they decode into
//!
//! Proposals carry actions in their opaque wire form ([`AnyAction`]). The
//! discriminant (`type_url`) selects a registered [`Msg`] type which knows
//! how to decode the payload and which signers it requires.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::address::Address;

/// Opaque, typed instruction as stored on a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyAction {
    /// Discriminant naming the message type
    pub type_url: String,
    /// serde_json encoding of the typed message
    pub value: Vec<u8>,
}

impl AnyAction {
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Encode a typed message into its opaque form
    pub fn pack<M: Msg>(msg: &M) -> Result<Self, CodecError> {
        let value = serde_json::to_vec(msg).map_err(|e| CodecError::Malformed {
            type_url: M::TYPE_URL.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(M::TYPE_URL, value))
    }

    /// Decode into a typed message, checking the discriminant first
    pub fn unpack<M: Msg>(&self) -> Result<M, CodecError> {
        if self.type_url != M::TYPE_URL {
            return Err(CodecError::TypeMismatch {
                expected: M::TYPE_URL.to_string(),
                actual: self.type_url.clone(),
            });
        }
        serde_json::from_slice(&self.value).map_err(|e| CodecError::Malformed {
            type_url: self.type_url.clone(),
            message: e.to_string(),
        })
    }
}

/// A typed message that can be carried as an action
pub trait Msg: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// Discriminant under which the message is registered
    const TYPE_URL: &'static str;

    /// Identities whose authorization this message requires
    fn signers(&self) -> Vec<Address>;
}

/// Batch the actions belong to; used to tag every error raised while
/// validating or dispatching them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Run at submission
    PreActions,
    /// Supplied by the executor
    Actions,
    /// Run at execution, after `Actions`
    PostActions,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreActions => "pre_actions",
            Self::Actions => "actions",
            Self::PostActions => "post_actions",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action decode failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unknown action type {type_url}")]
    UnknownType { type_url: String },

    #[error("action type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("malformed {type_url} payload: {message}")]
    Malformed { type_url: String, message: String },

    #[error("{type_url} declares no signers")]
    NoSigners { type_url: String },
}

//! Error types for the escrow module
//!
//! Every mutating call either commits fully or fails with one of these.
//! Nothing is swallowed: collaborator failures are wrapped with the batch
//! phase and index they occurred at.

use thiserror::Error;

use crate::action::{CodecError, Phase};

/// Result type for escrow operations
pub type Result<T> = std::result::Result<T, EscrowError>;

/// Error raised by an external action handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Broad class of an error, deciding how a caller may react to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request; retry only with corrected input
    Input,
    /// Referent never existed or was already consumed
    NotFound,
    /// Caller or signer lacks authority
    Authorization,
    /// A dispatched action failed; state is unchanged
    Execution,
    /// Internal bookkeeping is inconsistent; never recovered programmatically
    InvariantBroken,
}

/// Escrow module error types
#[derive(Debug, Error)]
pub enum EscrowError {
    // ========================================================================
    // Input Errors
    // ========================================================================

    /// Missing or malformed request field
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// Identity string could not be decoded
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Metadata exceeds the governance cap
    #[error("Metadata too long: {length} bytes exceeds maximum {max}")]
    MetadataTooLong { length: usize, max: u64 },

    #[error("Invalid params: {reason}")]
    InvalidParams { reason: String },

    #[error("Invalid genesis: {reason}")]
    InvalidGenesis { reason: String },

    /// Caller-supplied action could not be decoded
    #[error("{phase}[{index}]: {source}")]
    ActionDecode {
        phase: Phase,
        index: usize,
        #[source]
        source: CodecError,
    },

    // ========================================================================
    // Not Found Errors
    // ========================================================================

    #[error("Agent {address} not found")]
    AgentNotFound { address: String },

    #[error("Proposal {id} not found")]
    ProposalNotFound { id: u64 },

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// An action requires a signer outside the allowed set
    #[error("Permission denied: {phase}[{index}] requires signer {signer} which is not allowed")]
    UnauthorizedSigner {
        phase: Phase,
        index: usize,
        signer: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================

    /// No handler is routed for a decodable action
    #[error("{phase}[{index}]: no handler for {type_url}")]
    NoHandler {
        phase: Phase,
        index: usize,
        type_url: String,
    },

    /// A handler returned an error
    #[error("{phase}[{index}]: {source}")]
    ActionFailed {
        phase: Phase,
        index: usize,
        #[source]
        source: HandlerError,
    },

    // ========================================================================
    // Invariant Errors
    // ========================================================================

    /// Address derivation found no free address within the attempt bound
    #[error("Address space exhausted after {attempts} derivation attempts")]
    AddressSpaceExhausted { attempts: u32 },

    #[error("Invariant broken: {message}")]
    InvariantBroken { message: String },
}

impl EscrowError {
    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid address error
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Create an invariant broken error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantBroken {
            message: message.into(),
        }
    }

    /// Wrap a handler failure with its position in the batch
    pub fn action_failed(phase: Phase, index: usize, source: impl Into<HandlerError>) -> Self {
        Self::ActionFailed {
            phase,
            index,
            source: source.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. }
            | Self::InvalidAddress { .. }
            | Self::MetadataTooLong { .. }
            | Self::InvalidParams { .. }
            | Self::InvalidGenesis { .. }
            | Self::ActionDecode { .. } => ErrorKind::Input,
            Self::AgentNotFound { .. } | Self::ProposalNotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } | Self::UnauthorizedSigner { .. } => {
                ErrorKind::Authorization
            }
            Self::NoHandler { .. } | Self::ActionFailed { .. } => ErrorKind::Execution,
            Self::AddressSpaceExhausted { .. } | Self::InvariantBroken { .. } => {
                ErrorKind::InvariantBroken
            }
        }
    }

    /// Batch position if the error came from an action
    pub fn action_position(&self) -> Option<(Phase, usize)> {
        match self {
            Self::ActionDecode { phase, index, .. }
            | Self::UnauthorizedSigner { phase, index, .. }
            | Self::NoHandler { phase, index, .. }
            | Self::ActionFailed { phase, index, .. } => Some((*phase, *index)),
            _ => None,
        }
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
            Self::MetadataTooLong { .. } => "METADATA_TOO_LONG",
            Self::InvalidParams { .. } => "INVALID_PARAMS",
            Self::InvalidGenesis { .. } => "INVALID_GENESIS",
            Self::ActionDecode { .. } => "ACTION_DECODE",
            Self::AgentNotFound { .. } => "AGENT_NOT_FOUND",
            Self::ProposalNotFound { .. } => "PROPOSAL_NOT_FOUND",
            Self::PermissionDenied { .. } | Self::UnauthorizedSigner { .. } => "PERMISSION_DENIED",
            Self::NoHandler { .. } => "NO_HANDLER",
            Self::ActionFailed { .. } => "ACTION_FAILED",
            Self::AddressSpaceExhausted { .. } => "ADDRESS_SPACE_EXHAUSTED",
            Self::InvariantBroken { .. } => "INVARIANT_BROKEN",
        }
    }
}

impl From<serde_json::Error> for EscrowError {
    fn from(e: serde_json::Error) -> Self {
        EscrowError::InvariantBroken {
            message: format!("serialization: {}", e),
        }
    }
}

//! Escrow Types - Canonical domain types for the agent escrow module
//!
//! This crate contains all foundational types for the escrow module with zero
//! dependencies on other escrow crates. It defines:
//!
//! - Raw identities (`Address`) and the string codec used at the boundary
//! - Agents and proposals, the two records the module owns
//! - Opaque actions and the typed `Msg` trait they decode into
//! - Governance params and the genesis document
//! - Events and the unified error type
//!
//! # Architectural Invariants
//!
//! 1. An agent address backs at most one live agent record
//! 2. A proposal exists iff its agent was consumed and it was not executed
//! 3. Ids and addresses are never reused
//! 4. No action runs unless every required signer is in the allowed set

pub mod address;
pub mod action;
pub mod escrow;
pub mod event;
pub mod params;
pub mod genesis;
pub mod error;

pub use address::*;
pub use action::*;
pub use escrow::*;
pub use event::*;
pub use params::*;
pub use genesis::*;
pub use error::*;

/// Name under which the module derives its own identity
pub const MODULE_NAME: &str = "escrow";

/// Fixed tag mixed into every agent address derivation
pub const AGENT_DERIVATION_TAG: &[u8] = b"agent";

//! Escrow Core - Agent-brokered, two-phase escrow
//!
//! A proposer stages an exchange through a disposable agent identity; an
//! executor later completes it. The module is built from:
//!
//! - Agent Directory: derives, registers and consumes agent identities
//! - Action Executor: checks signers and dispatches opaque actions
//! - Proposal Engine: the submit/execute state machine
//! - `MsgServer`: the authorization boundary in front of all of the above
//!
//! # Key Principle
//!
//! Signers are validated BEFORE any state is touched, and every call runs
//! inside one atomic transaction (`run_atomic`): it commits fully or leaves
//! no trace.
//!
//! ```text
//! MsgServer ──validate──▶ ActionExecutor
//!     │
//!     └──▶ Keeper (proposals) ──▶ ActionExecutor ──▶ ActionRouter
//!               │
//!               └──▶ Keeper (agents) ──▶ AccountRegistry
//! ```

pub mod accounts;
pub mod agents;
pub mod config;
pub mod context;
pub mod executor;
pub mod genesis;
pub mod host;
pub mod invariants;
pub mod keeper;
pub mod msg_server;
pub mod params;
pub mod proposals;
pub mod query;
pub mod router;

#[cfg(test)]
mod testing;

pub use accounts::{AccountRegistry, BaseAccount, StoreAccountRegistry};
pub use config::EscrowConfig;
pub use context::Context;
pub use executor::ActionExecutor;
pub use host::{run_atomic, TxOutcome};
pub use keeper::Keeper;
pub use msg_server::{
    MsgCreateAgent, MsgCreateAgentResponse, MsgExec, MsgExecResponse, MsgServer,
    MsgSubmitProposal, MsgSubmitProposalResponse, MsgUpdateParams, MsgUpdateParamsResponse,
};
pub use query::{AgentsResponse, ProposalsResponse, QueryServer};
pub use router::{
    ActionCodec, ActionHandler, ActionRegistry, ActionResult, ActionRouter, DecodedAction,
};

pub use escrow_store::{PageRequest, PageResponse};
pub use escrow_types::*;

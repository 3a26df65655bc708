//! Agent and proposal records
//!
//! An agent is a disposable identity owned by the module. A proposal binds
//! exactly one consumed agent to the actions that complete the exchange.

use serde::{Deserialize, Deserializer, Serialize};

use crate::action::AnyAction;
use crate::address::Address;

/// Disposable delegate identity
///
/// Created by `CreateAgent`, never mutated, deleted when a proposal
/// referencing it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    /// Derived, collision-free account address
    pub address: Address,
    /// The only identity allowed to reference this agent in a proposal
    pub creator: Address,
}

impl Agent {
    pub fn new(address: Address, creator: Address) -> Self {
        Self { address, creator }
    }
}

/// A staged exchange awaiting execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Globally unique, monotonically assigned id
    pub id: u64,
    pub proposer: Address,
    /// Address of the agent consumed at submission
    pub agent: Address,
    /// Ran at submission, kept for inspection
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pre_actions: Vec<AnyAction>,
    /// Ran at execution, after the executor's own actions
    #[serde(default, deserialize_with = "null_as_empty")]
    pub post_actions: Vec<AnyAction>,
}

impl Proposal {
    pub fn new(
        id: u64,
        proposer: Address,
        agent: Address,
        pre_actions: Vec<AnyAction>,
        post_actions: Vec<AnyAction>,
    ) -> Self {
        Self {
            id,
            proposer,
            agent,
            pre_actions,
            post_actions,
        }
    }
}

// Older records may carry `null` action lists; read them back as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<AnyAction>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<AnyAction>>::deserialize(deserializer)?.unwrap_or_default())
}

//! Genesis document for the escrow module

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EscrowError, Result};
use crate::escrow::{Agent, Proposal};
use crate::params::Params;

/// First value handed out by every sequence
pub const FIRST_SEQUENCE: u64 = 1;

/// Full module state as exported/imported at chain boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    /// Next value of the agent derivation sequence
    pub next_agent_sequence: u64,
    /// Next proposal id to be issued
    pub next_proposal_id: u64,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            params: Params::default(),
            agents: Vec::new(),
            proposals: Vec::new(),
            next_agent_sequence: FIRST_SEQUENCE,
            next_proposal_id: FIRST_SEQUENCE,
        }
    }
}

impl GenesisState {
    /// Stateless checks run before import
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;

        if self.next_agent_sequence < FIRST_SEQUENCE {
            return Err(invalid("next_agent_sequence must be at least 1"));
        }
        if self.next_proposal_id < FIRST_SEQUENCE {
            return Err(invalid("next_proposal_id must be at least 1"));
        }

        let mut live_agents = HashSet::new();
        for agent in &self.agents {
            if !agent.address.is_valid() || !agent.creator.is_valid() {
                return Err(invalid(format!(
                    "agent with empty or oversized address or creator ({} / {} bytes)",
                    agent.address.len(),
                    agent.creator.len()
                )));
            }
            if !live_agents.insert(&agent.address) {
                return Err(invalid(format!("duplicate agent {}", agent.address)));
            }
        }

        let mut ids = HashSet::new();
        let mut bound_agents = HashSet::new();
        for proposal in &self.proposals {
            if proposal.id < FIRST_SEQUENCE {
                return Err(invalid("proposal id 0 is never issued"));
            }
            if proposal.id >= self.next_proposal_id {
                return Err(invalid(format!(
                    "proposal {} not below next_proposal_id {}",
                    proposal.id, self.next_proposal_id
                )));
            }
            if !ids.insert(proposal.id) {
                return Err(invalid(format!("duplicate proposal {}", proposal.id)));
            }
            if !proposal.proposer.is_valid() || !proposal.agent.is_valid() {
                return Err(invalid(format!(
                    "proposal {} has an empty or oversized proposer or agent",
                    proposal.id
                )));
            }
            // the agent of a submitted proposal has been consumed
            if live_agents.contains(&proposal.agent) {
                return Err(invalid(format!(
                    "proposal {} references live agent {}",
                    proposal.id, proposal.agent
                )));
            }
            if !bound_agents.insert(&proposal.agent) {
                return Err(invalid(format!(
                    "agent {} bound to more than one proposal",
                    proposal.agent
                )));
            }
        }

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> EscrowError {
    EscrowError::InvalidGenesis {
        reason: reason.into(),
    }
}

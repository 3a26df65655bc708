//! Agent Directory
//!
//! Agents are disposable identities owned by the module. Each one lives at
//! an address derived from the module name and a never-reused sequence
//! value, so nobody holds a key for it and no two agents ever share one.

use tracing::{info, warn};

use escrow_crypto::{sequence_key, ModuleCredential};
use escrow_store::{KvStore, ScanOrder};
use escrow_types::{
    Address, Agent, EscrowError, Event, Result, AGENT_DERIVATION_TAG, EVENT_AGENT_CREATED,
};

use crate::context::Context;
use crate::keeper::Keeper;

impl Keeper {
    /// Derive, register and record a fresh agent for `creator`
    ///
    /// A derived address already known to the account registry is skipped
    /// and the next sequence value tried, at most `max_address_attempts`
    /// times.
    pub fn create_agent(&self, ctx: &mut Context<'_>, creator: &Address) -> Result<Address> {
        if creator.is_empty() {
            return Err(EscrowError::invalid_input("creator", "empty creator"));
        }

        for attempt in 1..=self.max_address_attempts {
            let sequence = self
                .agent_sequence
                .next(ctx.store_mut())
                .map_err(|e| EscrowError::invariant(format!("agent sequence: {e}")))?;
            let credential = ModuleCredential::new(
                self.module_name.clone(),
                sequence_key(AGENT_DERIVATION_TAG, sequence),
            )?;
            let address = credential.address()?;

            if self.accounts.exists(ctx.store(), &address)? {
                warn!(
                    sequence,
                    attempt,
                    address = %self.display_address(&address),
                    "derived agent address already taken, retrying"
                );
                continue;
            }

            let account = self
                .accounts
                .create_account(ctx.store_mut(), address.clone(), Some(credential))
                .map_err(|e| EscrowError::invariant(format!("agent account: {e}")))?;
            self.accounts
                .register(ctx.store_mut(), &account)
                .map_err(|e| EscrowError::invariant(format!("agent account: {e}")))?;

            let agent = Agent::new(address.clone(), creator.clone());
            self.agents.insert(ctx.store_mut(), &agent)?;

            let encoded = self.encode_address(&address)?;
            let creator_encoded = self.encode_address(creator)?;
            ctx.emit(
                Event::new(EVENT_AGENT_CREATED)
                    .attr("agent", &encoded)
                    .attr("creator", &creator_encoded)
                    .attr("sequence", sequence),
            );
            info!("Agent {} created for {} (sequence {})", encoded, creator_encoded, sequence);
            return Ok(address);
        }

        Err(EscrowError::AddressSpaceExhausted {
            attempts: self.max_address_attempts,
        })
    }

    /// Look an agent up by address
    pub fn get_agent(&self, store: &dyn KvStore, address: &Address) -> Result<Agent> {
        self.agents
            .get_by_index(store, address)?
            .ok_or_else(|| self.agent_not_found(address))
    }

    /// Succeeds only if `creator` owns a live agent at `address`
    pub fn has_agent(&self, store: &dyn KvStore, address: &Address, creator: &Address) -> Result<()> {
        if self
            .agents
            .has(store, &(creator.clone(), address.clone()))?
        {
            Ok(())
        } else {
            Err(self.agent_not_found(address))
        }
    }

    /// Delete an agent record; its account stays registered
    pub fn remove_agent(&self, store: &mut dyn KvStore, address: &Address) -> Result<Agent> {
        let agent = self.get_agent(store, address)?;
        self.agents
            .remove(store, &(agent.creator.clone(), agent.address.clone()))?
            .ok_or_else(|| EscrowError::invariant("agent vanished during removal"))
    }

    /// Visit live agents in address order until `visit` returns false
    pub fn iterate_agents(
        &self,
        store: &dyn KvStore,
        mut visit: impl FnMut(&Agent) -> bool,
    ) -> Result<()> {
        for agent in self.agents.all(store, ScanOrder::Index)? {
            if !visit(&agent) {
                break;
            }
        }
        Ok(())
    }

    fn agent_not_found(&self, address: &Address) -> EscrowError {
        EscrowError::AgentNotFound {
            address: self.display_address(address),
        }
    }
}

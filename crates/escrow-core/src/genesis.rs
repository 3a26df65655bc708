//! Genesis import and export

use tracing::info;

use escrow_store::{CacheStore, KvStore, ScanOrder};
use escrow_types::{EscrowError, GenesisState, Result};

use crate::keeper::Keeper;

impl Keeper {
    /// Load a validated genesis document into the module store
    ///
    /// The import is buffered and committed only once every record is in,
    /// so a rejected document leaves the store untouched. Agents whose
    /// address is unknown to the account registry get an account
    /// registered, so later derivations treat the address as taken.
    pub fn init_genesis(&self, store: &mut dyn KvStore, genesis: &GenesisState) -> Result<()> {
        genesis.validate()?;

        let mut cache = CacheStore::new(store);
        let registered = self.import_genesis(&mut cache, genesis)?;
        cache.commit();

        info!(
            agents = genesis.agents.len(),
            proposals = genesis.proposals.len(),
            accounts_registered = registered,
            next_agent_sequence = genesis.next_agent_sequence,
            next_proposal_id = genesis.next_proposal_id,
            "escrow genesis imported"
        );
        Ok(())
    }

    fn import_genesis(&self, store: &mut dyn KvStore, genesis: &GenesisState) -> Result<usize> {
        self.set_params(store, &genesis.params)?;

        let mut registered = 0usize;
        for agent in &genesis.agents {
            let rejected = |e: EscrowError| EscrowError::InvalidGenesis {
                reason: format!("agent {}: {}", self.display_address(&agent.address), e),
            };
            if !self.accounts.exists(store, &agent.address).map_err(rejected)? {
                let account = self
                    .accounts
                    .create_account(store, agent.address.clone(), None)
                    .map_err(rejected)?;
                self.accounts.register(store, &account).map_err(rejected)?;
                registered += 1;
            }
            self.agents
                .insert(store, agent)
                .map_err(|e| rejected(e.into()))?;
        }

        for proposal in &genesis.proposals {
            self.proposals
                .insert(store, proposal)
                .map_err(|e| EscrowError::InvalidGenesis {
                    reason: format!("proposal {}: {}", proposal.id, e),
                })?;
        }

        self.agent_sequence.set(store, genesis.next_agent_sequence);
        self.proposal_sequence.set(store, genesis.next_proposal_id);
        Ok(registered)
    }

    /// Snapshot the module state
    ///
    /// Agents come out in address order and proposals in id order, so the
    /// same state always exports to the same document.
    pub fn export_genesis(&self, store: &dyn KvStore) -> Result<GenesisState> {
        let genesis = GenesisState {
            params: self.get_params(store)?,
            agents: self.agents.all(store, ScanOrder::Index)?,
            proposals: self.proposals.all(store, ScanOrder::Index)?,
            next_agent_sequence: self.agent_sequence.peek(store)?,
            next_proposal_id: self.proposal_sequence.peek(store)?,
        };
        info!(
            agents = genesis.agents.len(),
            proposals = genesis.proposals.len(),
            "escrow genesis exported"
        );
        Ok(genesis)
    }
}

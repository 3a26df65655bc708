//! Read-only queries
//!
//! Addresses come in as strings, like at the message boundary. List
//! queries are paged by store key; pass `pagination.next_key` back to
//! continue.

use escrow_store::{KeyEncode, KvStore, PageRequest, PageResponse, ScanOrder};
use escrow_types::{Address, Agent, EscrowError, Params, Proposal, Result};

use crate::keeper::Keeper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentsResponse {
    pub agents: Vec<Agent>,
    pub pagination: PageResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalsResponse {
    pub proposals: Vec<Proposal>,
    pub pagination: PageResponse,
}

/// Query server over a keeper
pub struct QueryServer<'k> {
    keeper: &'k Keeper,
}

impl<'k> QueryServer<'k> {
    pub fn new(keeper: &'k Keeper) -> Self {
        Self { keeper }
    }

    pub fn agent(&self, store: &dyn KvStore, address: &str) -> Result<Agent> {
        let address = self.decode("address", address)?;
        self.keeper.get_agent(store, &address)
    }

    /// All live agents, by address
    pub fn agents(&self, store: &dyn KvStore, page: &PageRequest) -> Result<AgentsResponse> {
        let (agents, pagination) = self.keeper.agents.page(store, ScanOrder::Index, None, page)?;
        Ok(AgentsResponse { agents, pagination })
    }

    /// Live agents of one creator, by address
    pub fn agents_by_creator(
        &self,
        store: &dyn KvStore,
        creator: &str,
        page: &PageRequest,
    ) -> Result<AgentsResponse> {
        let creator = self.decode("creator", creator)?.to_key()?;
        let (agents, pagination) =
            self.keeper
                .agents
                .page(store, ScanOrder::Primary, Some(&creator), page)?;
        Ok(AgentsResponse { agents, pagination })
    }

    pub fn proposal(&self, store: &dyn KvStore, id: u64) -> Result<Proposal> {
        self.keeper.get_proposal(store, id)
    }

    /// All live proposals, by id
    pub fn proposals(&self, store: &dyn KvStore, page: &PageRequest) -> Result<ProposalsResponse> {
        let (proposals, pagination) =
            self.keeper
                .proposals
                .page(store, ScanOrder::Index, None, page)?;
        Ok(ProposalsResponse {
            proposals,
            pagination,
        })
    }

    /// Live proposals of one proposer, by id
    pub fn proposals_by_proposer(
        &self,
        store: &dyn KvStore,
        proposer: &str,
        page: &PageRequest,
    ) -> Result<ProposalsResponse> {
        let proposer = self.decode("proposer", proposer)?.to_key()?;
        let (proposals, pagination) =
            self.keeper
                .proposals
                .page(store, ScanOrder::Primary, Some(&proposer), page)?;
        Ok(ProposalsResponse {
            proposals,
            pagination,
        })
    }

    pub fn params(&self, store: &dyn KvStore) -> Result<Params> {
        self.keeper.get_params(store)
    }

    fn decode(&self, field: &str, encoded: &str) -> Result<Address> {
        if encoded.is_empty() {
            return Err(EscrowError::invalid_input(field, "required"));
        }
        self.keeper.decode_address(encoded)
    }
}

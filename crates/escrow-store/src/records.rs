//! Table layouts of the escrow records
//!
//! Agents are keyed by (creator, address) so a creator's agents scan as one
//! range; the address index makes lookups by address O(1). Proposals follow
//! the same shape with (proposer, id) and an id index.

use escrow_types::{Address, Agent, Proposal};

use crate::table::Indexed;

impl Indexed for Agent {
    type PrimaryKey = (Address, Address);
    type IndexKey = Address;

    fn primary_key(&self) -> Self::PrimaryKey {
        (self.creator.clone(), self.address.clone())
    }

    fn index_key(&self) -> Self::IndexKey {
        self.address.clone()
    }
}

impl Indexed for Proposal {
    type PrimaryKey = (Address, u64);
    type IndexKey = u64;

    fn primary_key(&self) -> Self::PrimaryKey {
        (self.proposer.clone(), self.id)
    }

    fn index_key(&self) -> Self::IndexKey {
        self.id
    }
}

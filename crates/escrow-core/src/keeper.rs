//! Escrow keeper
//!
//! The keeper owns the module's store layout and its collaborators. The
//! Agent Directory (`agents.rs`), Proposal Engine (`proposals.rs`), params
//! and genesis are all implemented on it.
//!
//! Store layout under `<module_name>/`:
//!
//! | Byte | Content |
//! |------|---------|
//! | 0x01 | agents by (creator, address) |
//! | 0x02 | agent address index |
//! | 0x03 | proposals by (proposer, id) |
//! | 0x04 | proposal id index |
//! | 0x05 | next agent sequence |
//! | 0x06 | next proposal id |
//! | 0x07 | params |

use std::sync::Arc;

use escrow_crypto::module_address;
use escrow_store::{IndexedTable, Item, Sequence};
use escrow_types::{
    Address, AddressCodec, Agent, EscrowError, Params, PrefixedHexCodec, Proposal, Result,
    FIRST_SEQUENCE, MAX_ADDRESS_LEN,
};

use crate::accounts::AccountRegistry;
use crate::config::{EscrowConfig, GOV_MODULE_NAME};
use crate::executor::ActionExecutor;
use crate::router::ActionRegistry;

const AGENTS: u8 = 0x01;
const AGENT_ADDRESS_INDEX: u8 = 0x02;
const PROPOSALS: u8 = 0x03;
const PROPOSAL_ID_INDEX: u8 = 0x04;
const AGENT_SEQUENCE: u8 = 0x05;
const PROPOSAL_SEQUENCE: u8 = 0x06;
const PARAMS: u8 = 0x07;

fn store_key(module_name: &str, tag: u8) -> Vec<u8> {
    let mut key = Vec::with_capacity(module_name.len() + 2);
    key.extend_from_slice(module_name.as_bytes());
    key.push(b'/');
    key.push(tag);
    key
}

/// Escrow module keeper
pub struct Keeper {
    pub(crate) module_name: String,
    pub(crate) authority: Address,
    pub(crate) max_address_attempts: u32,
    pub(crate) address_codec: Arc<dyn AddressCodec>,
    pub(crate) accounts: Arc<dyn AccountRegistry>,
    pub(crate) executor: ActionExecutor,
    pub(crate) agents: IndexedTable<Agent>,
    pub(crate) proposals: IndexedTable<Proposal>,
    pub(crate) agent_sequence: Sequence,
    pub(crate) proposal_sequence: Sequence,
    pub(crate) params: Item<Params>,
}

impl Keeper {
    /// Build a keeper from validated config
    ///
    /// The address codec uses `config.address_prefix`; the authority is
    /// decoded with it, or defaults to the governance module address.
    pub fn new(
        config: &EscrowConfig,
        accounts: Arc<dyn AccountRegistry>,
        executor: ActionExecutor,
    ) -> Result<Self> {
        let codec: Arc<dyn AddressCodec> =
            Arc::new(PrefixedHexCodec::new(config.address_prefix.clone()));
        Self::with_address_codec(config, accounts, executor, codec)
    }

    /// Keeper whose codec and router are one `ActionRegistry`
    pub fn with_registry(
        config: &EscrowConfig,
        accounts: Arc<dyn AccountRegistry>,
        registry: Arc<ActionRegistry>,
    ) -> Result<Self> {
        Self::new(config, accounts, ActionExecutor::from_registry(registry))
    }

    pub fn with_address_codec(
        config: &EscrowConfig,
        accounts: Arc<dyn AccountRegistry>,
        executor: ActionExecutor,
        address_codec: Arc<dyn AddressCodec>,
    ) -> Result<Self> {
        config.validate()?;
        let authority = match &config.authority {
            Some(encoded) => address_codec.decode(encoded)?,
            None => module_address(GOV_MODULE_NAME),
        };
        let name = config.module_name.as_str();

        Ok(Self {
            module_name: config.module_name.clone(),
            authority,
            max_address_attempts: config.max_address_attempts,
            executor: executor.with_address_codec(address_codec.clone()),
            address_codec,
            accounts,
            agents: IndexedTable::new(
                "agent",
                &store_key(name, AGENTS),
                &store_key(name, AGENT_ADDRESS_INDEX),
            ),
            proposals: IndexedTable::new(
                "proposal",
                &store_key(name, PROPOSALS),
                &store_key(name, PROPOSAL_ID_INDEX),
            ),
            agent_sequence: Sequence::new(
                "agent_sequence",
                store_key(name, AGENT_SEQUENCE),
                FIRST_SEQUENCE,
            ),
            proposal_sequence: Sequence::new(
                "proposal_sequence",
                store_key(name, PROPOSAL_SEQUENCE),
                FIRST_SEQUENCE,
            ),
            params: Item::new(store_key(name, PARAMS)),
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Identity allowed to update params
    pub fn authority(&self) -> &Address {
        &self.authority
    }

    pub fn address_codec(&self) -> &dyn AddressCodec {
        self.address_codec.as_ref()
    }

    pub fn accounts(&self) -> &dyn AccountRegistry {
        self.accounts.as_ref()
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// Decode a boundary address string
    ///
    /// Identities longer than the store can key on are rejected here,
    /// whatever codec is installed.
    pub fn decode_address(&self, encoded: &str) -> Result<Address> {
        let address = self.address_codec.decode(encoded)?;
        if address.len() > MAX_ADDRESS_LEN {
            return Err(EscrowError::invalid_address(
                encoded,
                format!("{} bytes exceeds {}", address.len(), MAX_ADDRESS_LEN),
            ));
        }
        Ok(address)
    }

    pub fn encode_address(&self, address: &Address) -> Result<String> {
        self.address_codec.encode(address)
    }

    /// String form for errors and logs; falls back to bare hex
    pub(crate) fn display_address(&self, address: &Address) -> String {
        self.address_codec
            .encode(address)
            .unwrap_or_else(|_| address.to_hex())
    }
}

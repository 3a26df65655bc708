#![allow(dead_code)]

use std::sync::{Arc, Once};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use escrow_core::{
    run_atomic, Context, EscrowConfig, Keeper, MsgCreateAgent, MsgExec, MsgServer,
    MsgSubmitProposal, QueryServer, StoreAccountRegistry, TxOutcome,
};
use escrow_core::{ActionRegistry, ActionResult};
use escrow_store::{KvStore, MemStore};
use escrow_types::{Address, AnyAction, Event, Msg};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("insufficient funds: {address} has {balance}, needs {amount}")]
    InsufficientFunds {
        address: String,
        balance: u64,
        amount: u64,
    },

    #[error("balance overflow")]
    Overflow,

    #[error("{0}")]
    Rejected(String),
}

/// Move `amount` from `from` to `to`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgSend {
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

impl Msg for MsgSend {
    const TYPE_URL: &'static str = "/bank.MsgSend";

    fn signers(&self) -> Vec<Address> {
        vec![self.from.clone()]
    }
}

/// Always fails after touching state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgFail {
    pub signer: Address,
    pub reason: String,
}

impl Msg for MsgFail {
    const TYPE_URL: &'static str = "/bank.MsgFail";

    fn signers(&self) -> Vec<Address> {
        vec![self.signer.clone()]
    }
}

/// Decodable but never routed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgBurn {
    pub owner: Address,
    pub amount: u64,
}

impl Msg for MsgBurn {
    const TYPE_URL: &'static str = "/bank.MsgBurn";

    fn signers(&self) -> Vec<Address> {
        vec![self.owner.clone()]
    }
}

fn balance_key(address: &Address) -> Vec<u8> {
    let mut key = b"bank/".to_vec();
    key.extend_from_slice(address.as_bytes());
    key
}

pub fn balance(store: &dyn KvStore, address: &Address) -> u64 {
    store
        .get(&balance_key(address))
        .and_then(|bytes| <[u8; 8]>::try_from(bytes.as_slice()).ok())
        .map(u64::from_be_bytes)
        .unwrap_or(0)
}

pub fn set_balance(store: &mut dyn KvStore, address: &Address, amount: u64) {
    store.set(balance_key(address), amount.to_be_bytes().to_vec());
}

fn send(ctx: &mut Context<'_>, msg: &MsgSend) -> Result<ActionResult, BankError> {
    let from_balance = balance(ctx.store(), &msg.from);
    if from_balance < msg.amount {
        return Err(BankError::InsufficientFunds {
            address: msg.from.to_hex(),
            balance: from_balance,
            amount: msg.amount,
        });
    }
    let to_balance = balance(ctx.store(), &msg.to)
        .checked_add(msg.amount)
        .ok_or(BankError::Overflow)?;
    set_balance(ctx.store_mut(), &msg.from, from_balance - msg.amount);
    set_balance(ctx.store_mut(), &msg.to, to_balance);
    Ok(ActionResult::with_events(vec![Event::new("transfer")
        .attr("from", &msg.from)
        .attr("to", &msg.to)
        .attr("amount", msg.amount)]))
}

pub fn bank_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry
        .register::<MsgSend, _>(|ctx: &mut Context<'_>, msg: &MsgSend| Ok(send(ctx, msg)?))
        .register::<MsgFail, _>(|ctx: &mut Context<'_>, msg: &MsgFail| {
            set_balance(ctx.store_mut(), &msg.signer, 0);
            Err(BankError::Rejected(msg.reason.clone()).into())
        })
        .register_codec::<MsgBurn>();
    registry
}

pub fn send_action(from: &Address, to: &Address, amount: u64) -> AnyAction {
    AnyAction::pack(&MsgSend {
        from: from.clone(),
        to: to.clone(),
        amount,
    })
    .unwrap()
}

pub fn fail_action(signer: &Address, reason: &str) -> AnyAction {
    AnyAction::pack(&MsgFail {
        signer: signer.clone(),
        reason: reason.to_string(),
    })
    .unwrap()
}

pub fn burn_action(owner: &Address, amount: u64) -> AnyAction {
    AnyAction::pack(&MsgBurn {
        owner: owner.clone(),
        amount,
    })
    .unwrap()
}

pub fn user(b: u8) -> Address {
    Address::new(vec![b; 20])
}

/// Keeper plus an in-memory store, driven through the message server
pub struct TestApp {
    pub keeper: Keeper,
    pub store: MemStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(EscrowConfig::default())
    }

    pub fn with_config(config: EscrowConfig) -> Self {
        init_tracing();
        let keeper = Keeper::with_registry(
            &config,
            Arc::new(StoreAccountRegistry::new()),
            Arc::new(bank_registry()),
        )
        .unwrap();
        Self {
            keeper,
            store: MemStore::new(),
        }
    }

    pub fn encode(&self, address: &Address) -> String {
        self.keeper.encode_address(address).unwrap()
    }

    pub fn decode(&self, encoded: &str) -> Address {
        self.keeper.decode_address(encoded).unwrap()
    }

    pub fn query(&self) -> QueryServer<'_> {
        QueryServer::new(&self.keeper)
    }

    pub fn fund(&mut self, address: &Address, amount: u64) {
        set_balance(&mut self.store, address, amount);
    }

    pub fn balance(&self, address: &Address) -> u64 {
        balance(&self.store, address)
    }

    pub fn create_agent(&mut self, creator: &Address) -> TxOutcome<Address> {
        let msg = MsgCreateAgent {
            creator: self.encode(creator),
        };
        let server = MsgServer::new(&self.keeper);
        let keeper = &self.keeper;
        run_atomic(&mut self.store, |ctx| {
            let response = server.create_agent(ctx, &msg)?;
            keeper.decode_address(&response.address)
        })
    }

    pub fn submit(
        &mut self,
        proposer: &Address,
        agent: &Address,
        pre_actions: Vec<AnyAction>,
        post_actions: Vec<AnyAction>,
    ) -> TxOutcome<u64> {
        let msg = MsgSubmitProposal {
            proposer: self.encode(proposer),
            agent: self.encode(agent),
            pre_actions,
            post_actions,
            metadata: String::new(),
        };
        let server = MsgServer::new(&self.keeper);
        run_atomic(&mut self.store, |ctx| {
            server.submit_proposal(ctx, &msg).map(|r| r.proposal_id)
        })
    }

    pub fn exec(
        &mut self,
        id: u64,
        executor: &Address,
        agent: &Address,
        actions: Vec<AnyAction>,
    ) -> TxOutcome<()> {
        let msg = MsgExec {
            executor: self.encode(executor),
            agent: self.encode(agent),
            proposal_id: id,
            actions,
        };
        let server = MsgServer::new(&self.keeper);
        run_atomic(&mut self.store, |ctx| server.exec(ctx, &msg).map(|_| ()))
    }
}

//! Fixtures shared by the unit tests

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use escrow_store::KvStore;
use escrow_types::{Address, AnyAction, Event, Msg};

use crate::accounts::StoreAccountRegistry;
use crate::config::EscrowConfig;
use crate::context::Context;
use crate::keeper::Keeper;
use crate::router::{ActionRegistry, ActionResult};

pub(crate) fn addr(b: u8) -> Address {
    Address::new(vec![b; 20])
}

/// Appends `tag` to a log kept under `log/`; fails when `fail` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MsgLog {
    pub signer: Address,
    pub tag: String,
    #[serde(default)]
    pub fail: bool,
}

impl Msg for MsgLog {
    const TYPE_URL: &'static str = "/test.MsgLog";

    fn signers(&self) -> Vec<Address> {
        vec![self.signer.clone()]
    }
}

const LOG_KEY: &[u8] = b"log/entries";

pub(crate) fn log_action(signer: &Address, tag: &str) -> AnyAction {
    pack_log(signer, tag, false)
}

pub(crate) fn failing_action(signer: &Address, tag: &str) -> AnyAction {
    pack_log(signer, tag, true)
}

fn pack_log(signer: &Address, tag: &str, fail: bool) -> AnyAction {
    AnyAction::pack(&MsgLog {
        signer: signer.clone(),
        tag: tag.to_string(),
        fail,
    })
    .expect("pack MsgLog")
}

/// Tags logged so far, in order
pub(crate) fn logged(store: &dyn KvStore) -> Vec<String> {
    store
        .get(LOG_KEY)
        .map(|bytes| serde_json::from_slice(&bytes).expect("log entries"))
        .unwrap_or_default()
}

fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register::<MsgLog, _>(|ctx: &mut Context<'_>, msg: &MsgLog| {
        let mut entries = logged(ctx.store());
        entries.push(msg.tag.clone());
        ctx.store_mut()
            .set(LOG_KEY.to_vec(), serde_json::to_vec(&entries)?);
        if msg.fail {
            return Err(format!("{} failed", msg.tag).into());
        }
        Ok(ActionResult::with_events(vec![
            Event::new("logged").attr("tag", &msg.tag)
        ]))
    });
    registry
}

pub(crate) fn test_keeper_with(configure: impl FnOnce(&mut EscrowConfig)) -> Keeper {
    let mut config = EscrowConfig::default();
    configure(&mut config);
    Keeper::with_registry(
        &config,
        Arc::new(StoreAccountRegistry::new()),
        Arc::new(registry()),
    )
    .expect("test keeper")
}

pub(crate) fn test_keeper() -> Keeper {
    test_keeper_with(|_| {})
}

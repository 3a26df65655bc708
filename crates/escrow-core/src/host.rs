//! Host-side atomic runner
//!
//! Stands in for the ledger's per-transaction commit: every write a call
//! makes is buffered and only reaches the parent store if the call succeeds.

use tracing::warn;

use escrow_store::{CacheStore, KvStore};
use escrow_types::{Event, Result};

use crate::context::Context;

/// Result of one atomic call with the events it emitted
///
/// Events are empty when the call failed.
#[derive(Debug)]
pub struct TxOutcome<T> {
    pub result: Result<T>,
    pub events: Vec<Event>,
}

impl<T> TxOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `f` in a fresh transaction over `store`
///
/// Commits on `Ok`, discards every write on `Err`.
pub fn run_atomic<T>(
    store: &mut dyn KvStore,
    f: impl FnOnce(&mut Context<'_>) -> Result<T>,
) -> TxOutcome<T> {
    let mut cache = CacheStore::new(store);
    let mut ctx = Context::new(&mut cache);
    let result = f(&mut ctx);
    let events = ctx.into_events();

    match result {
        Ok(value) => {
            cache.commit();
            TxOutcome {
                result: Ok(value),
                events,
            }
        }
        Err(err) => {
            warn!(code = err.error_code(), error = %err, "call failed, discarding writes");
            cache.discard();
            TxOutcome {
                result: Err(err),
                events: Vec::new(),
            }
        }
    }
}

//! Action Executor
//!
//! Two passes over a batch of opaque actions:
//! - `validate_actions` is pure: it decodes every action and checks its
//!   required signers against an allowed set.
//! - `execute_actions` dispatches each action to its handler, in order,
//!   and appends handler events to the call's event log.
//!
//! Neither pass retries. The first failure aborts the batch; the host's
//! transaction discards whatever earlier actions wrote.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use escrow_types::{Address, AddressCodec, AnyAction, EscrowError, Phase, Result};

use crate::context::Context;
use crate::router::{ActionCodec, ActionRegistry, ActionRouter};

/// Signer-gated dispatcher over a codec and a router
#[derive(Clone)]
pub struct ActionExecutor {
    codec: Arc<dyn ActionCodec>,
    router: Arc<dyn ActionRouter>,
    // renders signers in errors; bare hex without one
    address_codec: Option<Arc<dyn AddressCodec>>,
}

impl ActionExecutor {
    pub fn new(codec: Arc<dyn ActionCodec>, router: Arc<dyn ActionRouter>) -> Self {
        Self {
            codec,
            router,
            address_codec: None,
        }
    }

    /// Executor whose codec and router are the same registry
    pub fn from_registry(registry: Arc<ActionRegistry>) -> Self {
        Self::new(registry.clone(), registry)
    }

    /// Report signers in the boundary string form of `codec`
    pub fn with_address_codec(mut self, codec: Arc<dyn AddressCodec>) -> Self {
        self.address_codec = Some(codec);
        self
    }

    fn display_signer(&self, signer: &Address) -> String {
        self.address_codec
            .as_ref()
            .and_then(|codec| codec.encode(signer).ok())
            .unwrap_or_else(|| signer.to_hex())
    }

    /// Check that every signer of every action is in `allowed`
    ///
    /// Touches no state. An empty batch always passes.
    pub fn validate_actions(
        &self,
        phase: Phase,
        actions: &[AnyAction],
        allowed: &BTreeSet<Address>,
    ) -> Result<()> {
        for (index, action) in actions.iter().enumerate() {
            let decoded = self
                .codec
                .decode(action)
                .map_err(|source| EscrowError::ActionDecode {
                    phase,
                    index,
                    source,
                })?;
            let signers = self
                .codec
                .required_signers(&decoded)
                .map_err(|source| EscrowError::ActionDecode {
                    phase,
                    index,
                    source,
                })?;
            if let Some(signer) = signers.iter().find(|s| !allowed.contains(*s)) {
                return Err(EscrowError::UnauthorizedSigner {
                    phase,
                    index,
                    signer: self.display_signer(signer),
                });
            }
        }
        Ok(())
    }

    /// Run every action in order against `ctx`
    ///
    /// Post-actions were decoded when their proposal was submitted, so a
    /// decode failure there is a broken invariant rather than bad input.
    pub fn execute_actions(
        &self,
        ctx: &mut Context<'_>,
        phase: Phase,
        actions: &[AnyAction],
    ) -> Result<()> {
        for (index, action) in actions.iter().enumerate() {
            let decoded = self.codec.decode(action).map_err(|source| match phase {
                Phase::PostActions => EscrowError::invariant(format!(
                    "stored {phase}[{index}] no longer decodes: {source}"
                )),
                _ => EscrowError::ActionDecode {
                    phase,
                    index,
                    source,
                },
            })?;
            let handler =
                self.router
                    .resolve(&decoded)
                    .ok_or_else(|| EscrowError::NoHandler {
                        phase,
                        index,
                        type_url: action.type_url.clone(),
                    })?;
            let result = handler
                .handle(ctx, &decoded)
                .map_err(|source| EscrowError::action_failed(phase, index, source))?;

            debug!(
                phase = %phase,
                index,
                type_url = %action.type_url,
                events = result.events.len(),
                "action executed"
            );
            ctx.extend_events(result.events);
        }
        Ok(())
    }
}

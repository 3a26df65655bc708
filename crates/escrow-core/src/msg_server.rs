//! Authorization boundary
//!
//! Every mutating request enters here. Requests carry identities as
//! strings; the server rejects empty fields and undecodable addresses,
//! then checks every action's signers against the allowed set, all before
//! the keeper touches state.
//!
//! | Request | Allowed signers |
//! |---------|-----------------|
//! | `MsgSubmitProposal` | proposer, agent (pre- and post-actions) |
//! | `MsgExec` | executor, agent |

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use escrow_types::{
    Address, AnyAction, EscrowError, Event, Params, Phase, Result, EVENT_PARAMS_UPDATED,
};

use crate::context::Context;
use crate::keeper::Keeper;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateAgent {
    pub creator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateAgentResponse {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitProposal {
    pub proposer: String,
    pub agent: String,
    #[serde(default)]
    pub pre_actions: Vec<AnyAction>,
    #[serde(default)]
    pub post_actions: Vec<AnyAction>,
    /// Free-form note; length-checked, not stored
    #[serde(default)]
    pub metadata: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitProposalResponse {
    pub proposal_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExec {
    pub executor: String,
    pub agent: String,
    pub proposal_id: u64,
    #[serde(default)]
    pub actions: Vec<AnyAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExecResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: String,
    pub params: Params,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParamsResponse {}

/// Message server over a keeper
pub struct MsgServer<'k> {
    keeper: &'k Keeper,
}

impl<'k> MsgServer<'k> {
    pub fn new(keeper: &'k Keeper) -> Self {
        Self { keeper }
    }

    pub fn create_agent(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgCreateAgent,
    ) -> Result<MsgCreateAgentResponse> {
        let creator = self.required_address("creator", &msg.creator)?;
        let address = self.keeper.create_agent(ctx, &creator)?;
        Ok(MsgCreateAgentResponse {
            address: self.keeper.encode_address(&address)?,
        })
    }

    pub fn submit_proposal(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgSubmitProposal,
    ) -> Result<MsgSubmitProposalResponse> {
        let proposer = self.required_address("proposer", &msg.proposer)?;
        let agent = self.required_address("agent", &msg.agent)?;

        self.keeper
            .get_params(ctx.store())?
            .check_metadata(&msg.metadata)?;

        let allowed = BTreeSet::from([proposer.clone(), agent.clone()]);
        let executor = self.keeper.executor();
        executor.validate_actions(Phase::PreActions, &msg.pre_actions, &allowed)?;
        executor.validate_actions(Phase::PostActions, &msg.post_actions, &allowed)?;

        let proposal_id = self.keeper.submit_proposal(
            ctx,
            &proposer,
            &agent,
            msg.pre_actions.clone(),
            msg.post_actions.clone(),
        )?;
        Ok(MsgSubmitProposalResponse { proposal_id })
    }

    pub fn exec(&self, ctx: &mut Context<'_>, msg: &MsgExec) -> Result<MsgExecResponse> {
        let executor = self.required_address("executor", &msg.executor)?;
        let agent = self.required_address("agent", &msg.agent)?;

        let allowed = BTreeSet::from([executor.clone(), agent.clone()]);
        self.keeper
            .executor()
            .validate_actions(Phase::Actions, &msg.actions, &allowed)?;

        self.keeper
            .exec(ctx, msg.proposal_id, &executor, &agent, &msg.actions)?;
        Ok(MsgExecResponse {})
    }

    /// Replace params; only the configured authority may call this
    pub fn update_params(
        &self,
        ctx: &mut Context<'_>,
        msg: &MsgUpdateParams,
    ) -> Result<MsgUpdateParamsResponse> {
        let authority = self.required_address("authority", &msg.authority)?;
        if &authority != self.keeper.authority() {
            return Err(EscrowError::permission_denied(format!(
                "expected authority {}, got {}",
                self.keeper.display_address(self.keeper.authority()),
                msg.authority
            )));
        }

        self.keeper.set_params(ctx.store_mut(), &msg.params)?;
        ctx.emit(
            Event::new(EVENT_PARAMS_UPDATED)
                .attr("authority", &msg.authority)
                .attr("max_metadata_length", msg.params.max_metadata_length),
        );
        info!("Escrow params updated by {}", msg.authority);
        Ok(MsgUpdateParamsResponse {})
    }

    fn required_address(&self, field: &str, encoded: &str) -> Result<Address> {
        if encoded.is_empty() {
            return Err(EscrowError::invalid_input(field, "required"));
        }
        self.keeper.decode_address(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::run_atomic;
    use crate::testing::{addr, log_action, test_keeper};
    use escrow_store::MemStore;

    fn encode(keeper: &Keeper, address: &Address) -> String {
        keeper.encode_address(address).unwrap()
    }

    #[test]
    fn test_empty_fields_rejected() {
        let keeper = test_keeper();
        let server = MsgServer::new(&keeper);
        let mut store = MemStore::new();

        let err = run_atomic(&mut store, |ctx| {
            server.create_agent(ctx, &MsgCreateAgent { creator: String::new() })
        })
        .result
        .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidInput { ref field, .. } if field == "creator"));

        let err = run_atomic(&mut store, |ctx| {
            server.exec(
                ctx,
                &MsgExec {
                    executor: encode(&keeper, &addr(3)),
                    agent: String::new(),
                    proposal_id: 1,
                    actions: vec![],
                },
            )
        })
        .result
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_address_rejected() {
        let keeper = test_keeper();
        let server = MsgServer::new(&keeper);
        let mut store = MemStore::new();
        let err = run_atomic(&mut store, |ctx| {
            server.create_agent(ctx, &MsgCreateAgent { creator: "escrow_zz".to_string() })
        })
        .result
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ADDRESS");
    }

    #[test]
    fn test_post_actions_checked_at_submission() {
        let keeper = test_keeper();
        let server = MsgServer::new(&keeper);
        let mut store = MemStore::new();
        let proposer = encode(&keeper, &addr(1));
        let agent = run_atomic(&mut store, |ctx| {
            server.create_agent(ctx, &MsgCreateAgent { creator: proposer.clone() })
        })
        .result
        .unwrap()
        .address;
        let before = store.clone();

        let msg = MsgSubmitProposal {
            proposer: proposer.clone(),
            agent: agent.clone(),
            pre_actions: vec![],
            post_actions: vec![log_action(&addr(1), "ok"), log_action(&addr(9), "stranger")],
            metadata: String::new(),
        };
        let err = run_atomic(&mut store, |ctx| server.submit_proposal(ctx, &msg))
            .result
            .unwrap_err();
        assert_eq!(err.action_position(), Some((Phase::PostActions, 1)));
        assert_eq!(err.error_code(), "PERMISSION_DENIED");
        assert_eq!(store, before);
    }

    #[test]
    fn test_metadata_cap() {
        let keeper = test_keeper();
        let server = MsgServer::new(&keeper);
        let mut store = MemStore::new();
        keeper.set_params(&mut store, &Params::new(3)).unwrap();

        let msg = MsgSubmitProposal {
            proposer: encode(&keeper, &addr(1)),
            agent: encode(&keeper, &addr(2)),
            pre_actions: vec![],
            post_actions: vec![],
            metadata: "four".to_string(),
        };
        let err = run_atomic(&mut store, |ctx| server.submit_proposal(ctx, &msg))
            .result
            .unwrap_err();
        assert_eq!(err.error_code(), "METADATA_TOO_LONG");
    }

    #[test]
    fn test_update_params_requires_authority() {
        let keeper = test_keeper();
        let server = MsgServer::new(&keeper);
        let mut store = MemStore::new();

        let err = run_atomic(&mut store, |ctx| {
            server.update_params(
                ctx,
                &MsgUpdateParams {
                    authority: encode(&keeper, &addr(1)),
                    params: Params::new(10),
                },
            )
        })
        .result
        .unwrap_err();
        assert_eq!(err.error_code(), "PERMISSION_DENIED");

        let outcome = run_atomic(&mut store, |ctx| {
            server.update_params(
                ctx,
                &MsgUpdateParams {
                    authority: encode(&keeper, keeper.authority()),
                    params: Params::new(10),
                },
            )
        });
        assert!(outcome.is_ok());
        assert_eq!(outcome.events[0].kind, EVENT_PARAMS_UPDATED);
        assert_eq!(keeper.get_params(&store).unwrap(), Params::new(10));
    }
}

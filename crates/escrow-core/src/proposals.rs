//! Proposal Engine
//!
//! A proposal id moves `absent → submitted → absent`:
//!
//! - `submit_proposal` consumes the proposer's agent, records the proposal
//!   and runs its pre-actions.
//! - `exec` runs the executor's actions, then the stored post-actions, then
//!   deletes the proposal.
//!
//! Both run inside the host's transaction. A failure at any step leaves
//! nothing behind, so a failed `exec` can be retried as is.

use tracing::info;

use escrow_store::{KvStore, ScanOrder};
use escrow_types::{
    Address, AnyAction, EscrowError, Event, Phase, Proposal, Result, EVENT_PROPOSAL_EXECUTED,
    EVENT_PROPOSAL_SUBMITTED,
};

use crate::context::Context;
use crate::keeper::Keeper;

impl Keeper {
    /// Stage a proposal through `agent`; returns the new proposal id
    ///
    /// Only the agent's creator may submit through it, and only once.
    pub fn submit_proposal(
        &self,
        ctx: &mut Context<'_>,
        proposer: &Address,
        agent: &Address,
        pre_actions: Vec<AnyAction>,
        post_actions: Vec<AnyAction>,
    ) -> Result<u64> {
        self.has_agent(ctx.store(), agent, proposer)?;

        let id = self
            .proposal_sequence
            .next(ctx.store_mut())
            .map_err(|e| EscrowError::invariant(format!("proposal sequence: {e}")))?;

        let proposal = Proposal::new(id, proposer.clone(), agent.clone(), pre_actions, post_actions);
        self.proposals.insert(ctx.store_mut(), &proposal)?;

        self.executor
            .execute_actions(ctx, Phase::PreActions, &proposal.pre_actions)?;

        self.remove_agent(ctx.store_mut(), agent)?;

        let proposer_encoded = self.display_address(proposer);
        ctx.emit(
            Event::new(EVENT_PROPOSAL_SUBMITTED)
                .attr("proposal_id", id)
                .attr("proposer", &proposer_encoded)
                .attr("agent", self.display_address(agent)),
        );
        info!(
            "Proposal {} submitted by {} ({} pre-actions, {} post-actions)",
            id,
            proposer_encoded,
            proposal.pre_actions.len(),
            proposal.post_actions.len()
        );
        Ok(id)
    }

    /// Complete proposal `id` through its agent
    ///
    /// `actions` run first, then the stored post-actions; the proposal is
    /// deleted only after both succeed.
    pub fn exec(
        &self,
        ctx: &mut Context<'_>,
        id: u64,
        executor: &Address,
        agent: &Address,
        actions: &[AnyAction],
    ) -> Result<()> {
        let proposal = self.get_proposal(ctx.store(), id)?;
        if &proposal.agent != agent {
            return Err(EscrowError::permission_denied("agent differs"));
        }

        self.executor.execute_actions(ctx, Phase::Actions, actions)?;
        self.executor
            .execute_actions(ctx, Phase::PostActions, &proposal.post_actions)?;

        self.proposals
            .remove(ctx.store_mut(), &(proposal.proposer.clone(), id))?
            .ok_or_else(|| EscrowError::invariant(format!("proposal {id} vanished during exec")))?;

        let executor_encoded = self.display_address(executor);
        ctx.emit(
            Event::new(EVENT_PROPOSAL_EXECUTED)
                .attr("proposal_id", id)
                .attr("executor", &executor_encoded)
                .attr("agent", self.display_address(agent)),
        );
        info!("Proposal {} executed by {}", id, executor_encoded);
        Ok(())
    }

    /// Look a live proposal up by id
    pub fn get_proposal(&self, store: &dyn KvStore, id: u64) -> Result<Proposal> {
        self.proposals
            .get_by_index(store, &id)?
            .ok_or(EscrowError::ProposalNotFound { id })
    }

    /// Visit live proposals in id order until `visit` returns false
    pub fn iterate_proposals(
        &self,
        store: &dyn KvStore,
        mut visit: impl FnMut(&Proposal) -> bool,
    ) -> Result<()> {
        for proposal in self.proposals.all(store, ScanOrder::Index)? {
            if !visit(&proposal) {
                break;
            }
        }
        Ok(())
    }
}

//! Store-wide invariant checks
//!
//! Meant for tests, genesis tooling and operator diagnostics. Never called
//! on the transaction path.

use tracing::error;

use escrow_store::{KvStore, ScanOrder};
use escrow_types::{EscrowError, Result};

use crate::keeper::Keeper;

impl Keeper {
    /// Every broken invariant, one message each; empty when healthy
    pub fn invariant_violations(&self, store: &dyn KvStore) -> Result<Vec<String>> {
        let mut problems = self.agents.check_consistency(store)?;
        problems.extend(self.proposals.check_consistency(store)?);

        for agent in self.agents.all(store, ScanOrder::Index)? {
            if !self.accounts.exists(store, &agent.address)? {
                problems.push(format!(
                    "agent {} has no registered account",
                    self.display_address(&agent.address)
                ));
            }
        }

        let next_id = self.proposal_sequence.peek(store)?;
        for proposal in self.proposals.all(store, ScanOrder::Index)? {
            if proposal.id >= next_id {
                problems.push(format!(
                    "proposal {} not below next proposal id {}",
                    proposal.id, next_id
                ));
            }
            if self.agents.get_by_index(store, &proposal.agent)?.is_some() {
                problems.push(format!(
                    "proposal {} is bound to live agent {}",
                    proposal.id,
                    self.display_address(&proposal.agent)
                ));
            }
        }

        Ok(problems)
    }

    /// Fail with `InvariantBroken` listing every violation
    pub fn check_invariants(&self, store: &dyn KvStore) -> Result<()> {
        let problems = self.invariant_violations(store)?;
        if problems.is_empty() {
            return Ok(());
        }
        for problem in &problems {
            error!(problem = %problem, "escrow invariant broken");
        }
        Err(EscrowError::invariant(problems.join("; ")))
    }
}

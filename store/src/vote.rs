//! Vote table, keyed by (proposal, voter).

use crate::StoreError;
use qv_types::{Principal, ProposalId};
use serde::{Deserialize, Serialize};

/// A live vote. Absent from the table once withdrawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Cumulative stake committed by this voter to this proposal. Always > 0.
    pub stake: u128,
    /// `isqrt(stake)`.
    pub vote_weight: u128,
}

/// Trait for vote table reads.
pub trait VoteStore {
    /// Get a specific voter's live vote on a proposal.
    fn get_vote(
        &self,
        proposal: ProposalId,
        voter: &Principal,
    ) -> Result<Option<VoteRecord>, StoreError>;

    /// All live votes on a proposal.
    fn iter_votes(&self, proposal: ProposalId) -> Result<Vec<(Principal, VoteRecord)>, StoreError>;
}

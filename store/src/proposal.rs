//! Proposal table.

use crate::StoreError;
use qv_types::{BlockHeight, Principal, ProposalId};
use serde::{Deserialize, Serialize};

/// A stored proposal.
///
/// Everything except `total_vote_weight` is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub title: String,
    pub description: String,
    pub creator: Principal,
    /// Logical time of creation.
    pub created_at: BlockHeight,
    /// Sum of `vote_weight` over all live votes on this proposal.
    pub total_vote_weight: u128,
}

/// Trait for proposal table reads.
pub trait ProposalStore {
    /// Look up a proposal by id.
    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError>;

    /// All proposals in ascending id order.
    fn iter_proposals(&self) -> Result<Vec<(ProposalId, ProposalRecord)>, StoreError>;

    /// Check if a proposal exists.
    fn proposal_exists(&self, id: ProposalId) -> Result<bool, StoreError> {
        self.get_proposal(id).map(|p| p.is_some())
    }
}

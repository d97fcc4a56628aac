//! Consistency audit over the proposal and vote tables.
//!
//! See [`crate::QuadraticVoting::audit`].

use qv_types::{Principal, ProposalId};
use serde::Serialize;

/// A single disagreement between stored and recomputed state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "kebab-case")]
pub enum AuditProblem {
    /// A proposal's stored total differs from the sum of its live vote weights.
    TotalWeightMismatch {
        proposal: ProposalId,
        stored: u128,
        recomputed: u128,
    },
    /// A vote's stored weight is not `isqrt(stake)`.
    VoteWeightMismatch {
        proposal: ProposalId,
        voter: Principal,
        stake: u128,
        stored: u128,
    },
    /// A live vote with zero stake.
    ZeroStake {
        proposal: ProposalId,
        voter: Principal,
    },
    /// The ranking differs from one rebuilt from the proposal table.
    RankingMismatch {
        stored: Vec<ProposalId>,
        expected: Vec<ProposalId>,
    },
    /// The proposal counter does not match the contiguous id range on disk.
    CountMismatch { counter: u64, proposals: u64 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub proposals_checked: u64,
    pub votes_checked: u64,
    pub problems: Vec<AuditProblem>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

//! Events emitted by successful mutating calls.

use qv_types::{BlockHeight, Principal, ProposalId};
use serde::Serialize;

/// One event per successful mutation, in call order.
///
/// Serialized with an `event` tag (`"proposal-created"`, `"vote-cast"`,
/// `"vote-withdrawn"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum VoteEvent {
    ProposalCreated {
        proposal: ProposalId,
        creator: Principal,
        created_at: BlockHeight,
    },
    VoteCast {
        voter: Principal,
        proposal: ProposalId,
        /// Stake added by this call.
        stake: u128,
        /// Voter's cumulative stake after this call.
        total_stake: u128,
        /// Voter's weight after this call.
        weight: u128,
    },
    VoteWithdrawn {
        voter: Principal,
        proposal: ProposalId,
        stake: u128,
        weight: u128,
    },
}

//! Voting errors.
//!
//! The numeric codes are part of the external contract and must not change.

use qv_store::StoreError;
use qv_types::{Principal, ProposalId};
use thiserror::Error;

pub const ERR_UNAUTHORIZED: u32 = 100;
pub const ERR_INVALID_PROPOSAL: u32 = 101;
pub const ERR_NO_STAKE: u32 = 102;
pub const ERR_INVALID_AMOUNT: u32 = 103;
pub const ERR_INSERT_FAILED: u32 = 104;
/// Title or description rejected. Outside the original 100..=104 range.
pub const ERR_INVALID_TEXT: u32 = 105;

#[derive(Debug, Error)]
pub enum VotingError {
    /// Reserved for operations gated to a privileged identity.
    #[error("caller is not authorized")]
    Unauthorized,

    #[error("proposal {0} does not exist")]
    InvalidProposal(ProposalId),

    #[error("{voter} has no live vote on proposal {proposal}")]
    NoStake {
        proposal: ProposalId,
        voter: Principal,
    },

    #[error("invalid stake amount {amount}: {reason}")]
    InvalidAmount { amount: u128, reason: &'static str },

    #[error("storage operation failed: {0}")]
    InsertFailed(#[from] StoreError),

    #[error("invalid {field}: {reason}")]
    InvalidText { field: &'static str, reason: String },
}

impl VotingError {
    /// The numeric error code surfaced to callers.
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized => ERR_UNAUTHORIZED,
            Self::InvalidProposal(_) => ERR_INVALID_PROPOSAL,
            Self::NoStake { .. } => ERR_NO_STAKE,
            Self::InvalidAmount { .. } => ERR_INVALID_AMOUNT,
            Self::InsertFailed(_) => ERR_INSERT_FAILED,
            Self::InvalidText { .. } => ERR_INVALID_TEXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let voter = Principal::parse("wallet_1").unwrap();
        assert_eq!(VotingError::Unauthorized.code(), 100);
        assert_eq!(VotingError::InvalidProposal(ProposalId::new(0)).code(), 101);
        assert_eq!(
            VotingError::NoStake {
                proposal: ProposalId::new(0),
                voter
            }
            .code(),
            102
        );
        assert_eq!(
            VotingError::InvalidAmount {
                amount: 0,
                reason: "stake must be positive"
            }
            .code(),
            103
        );
        assert_eq!(
            VotingError::InsertFailed(StoreError::Backend("disk full".into())).code(),
            104
        );
    }
}

//! Binary key layout shared by ordered backends.
//!
//! Vote keys are `proposal_id (8 bytes, big-endian) ++ voter bytes`, so all
//! votes on one proposal are contiguous and share an 8-byte prefix.

use crate::StoreError;
use qv_types::{Principal, ProposalId};

pub fn vote_key(proposal: ProposalId, voter: &Principal) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + voter.as_bytes().len());
    key.extend_from_slice(&proposal.to_key());
    key.extend_from_slice(voter.as_bytes());
    key
}

/// Split a vote key back into its parts.
pub fn split_vote_key(key: &[u8]) -> Result<(ProposalId, Principal), StoreError> {
    let id = ProposalId::from_key(key)
        .ok_or_else(|| StoreError::Corruption("vote key shorter than 8 bytes".into()))?;
    let voter = std::str::from_utf8(&key[8..])
        .map_err(|e| StoreError::Corruption(format!("vote key voter: {}", e)))?;
    let voter = Principal::parse(voter)
        .map_err(|e| StoreError::Corruption(format!("vote key voter: {}", e)))?;
    Ok((id, voter))
}

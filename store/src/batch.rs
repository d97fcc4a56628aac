//! Write batching: the unit of atomicity.
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.put_vote(id, &voter, record);
//! batch.put_proposal(id, &proposal);
//! store.commit(batch)?;
//! ```

use crate::{ProposalRecord, VoteRecord};
use qv_types::{Principal, ProposalId};

/// One pending write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreOp {
    PutProposal(ProposalId, ProposalRecord),
    PutVote(ProposalId, Principal, VoteRecord),
    DeleteVote(ProposalId, Principal),
    PutMeta(String, Vec<u8>),
}

/// An ordered list of writes applied all-or-nothing by [`crate::VotingStore::commit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<StoreOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_proposal(&mut self, id: ProposalId, record: &ProposalRecord) {
        self.ops.push(StoreOp::PutProposal(id, record.clone()));
    }

    pub fn put_vote(&mut self, proposal: ProposalId, voter: &Principal, record: VoteRecord) {
        self.ops
            .push(StoreOp::PutVote(proposal, voter.clone(), record));
    }

    pub fn delete_vote(&mut self, proposal: ProposalId, voter: &Principal) {
        self.ops.push(StoreOp::DeleteVote(proposal, voter.clone()));
    }

    pub fn put_meta(&mut self, key: &str, value: Vec<u8>) {
        self.ops.push(StoreOp::PutMeta(key.to_string(), value));
    }

    /// Store a `u64` meta value big-endian (see [`crate::MetaStore::get_meta_u64`]).
    pub fn put_meta_u64(&mut self, key: &str, value: u64) {
        self.put_meta(key, value.to_be_bytes().to_vec());
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<StoreOp> {
        self.ops
    }
}

//! Atomic batch commit: every [`StoreOp`] of a batch goes into a single LMDB
//! write transaction.
//!
//! If any operation fails the transaction is dropped without committing and
//! LMDB aborts it, so none of the batch is visible.

use qv_store::layout::vote_key;
use qv_store::{StoreError, StoreOp, VotingStore, WriteBatch};

use crate::{LmdbEnvironment, LmdbError};

impl VotingStore for LmdbEnvironment {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let op_count = batch.len();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        for op in batch.into_ops() {
            match op {
                StoreOp::PutProposal(id, record) => {
                    let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
                    self.proposals_db
                        .put(&mut wtxn, &id.to_key(), &bytes)
                        .map_err(LmdbError::from)?;
                }
                StoreOp::PutVote(id, voter, record) => {
                    let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
                    self.votes_db
                        .put(&mut wtxn, &vote_key(id, &voter), &bytes)
                        .map_err(LmdbError::from)?;
                }
                StoreOp::DeleteVote(id, voter) => {
                    self.votes_db
                        .delete(&mut wtxn, &vote_key(id, &voter))
                        .map_err(LmdbError::from)?;
                }
                StoreOp::PutMeta(key, value) => {
                    self.meta_db
                        .put(&mut wtxn, key.as_bytes(), &value)
                        .map_err(LmdbError::from)?;
                }
            }
        }

        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(ops = op_count, "committed write batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qv_store::meta::keys;
    use qv_store::{MetaStore, ProposalRecord, ProposalStore, VoteRecord, VoteStore};
    use qv_types::{BlockHeight, Principal, ProposalId};

    fn open_test_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (dir, env)
    }

    fn voter(name: &str) -> Principal {
        Principal::parse(name).unwrap()
    }

    fn proposal(title: &str, weight: u128) -> ProposalRecord {
        ProposalRecord {
            title: title.to_string(),
            description: "Description".to_string(),
            creator: voter("wallet_1"),
            created_at: BlockHeight::new(1),
            total_vote_weight: weight,
        }
    }

    #[test]
    fn test_commit_and_read_back() {
        let (_dir, env) = open_test_env();
        let id = ProposalId::new(0);
        let mut batch = WriteBatch::new();
        batch.put_proposal(id, &proposal("Test", 3));
        batch.put_vote(id, &voter("wallet_1"), VoteRecord { stake: 9, vote_weight: 3 });
        batch.put_meta_u64(keys::PROPOSAL_COUNT, 1);
        env.commit(batch).unwrap();

        assert_eq!(env.get_proposal(id).unwrap(), Some(proposal("Test", 3)));
        assert_eq!(
            env.get_vote(id, &voter("wallet_1")).unwrap(),
            Some(VoteRecord { stake: 9, vote_weight: 3 })
        );
        assert_eq!(env.get_meta_u64(keys::PROPOSAL_COUNT).unwrap(), 1);
        assert!(env.get_proposal(ProposalId::new(1)).unwrap().is_none());
    }

    #[test]
    fn test_iter_proposals_in_id_order() {
        let (_dir, env) = open_test_env();
        let mut batch = WriteBatch::new();
        // Insert out of order; 256 would sort before 2 with little-endian keys.
        for raw in [256u64, 2, 0, 1] {
            batch.put_proposal(ProposalId::new(raw), &proposal(&format!("P{}", raw), 0));
        }
        env.commit(batch).unwrap();

        let ids: Vec<u64> = env
            .iter_proposals()
            .unwrap()
            .into_iter()
            .map(|(id, _)| id.as_u64())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 256]);
    }

    #[test]
    fn test_iter_votes_uses_proposal_prefix() {
        let (_dir, env) = open_test_env();
        let mut batch = WriteBatch::new();
        batch.put_vote(ProposalId::new(0), &voter("a"), VoteRecord { stake: 1, vote_weight: 1 });
        batch.put_vote(ProposalId::new(1), &voter("a"), VoteRecord { stake: 4, vote_weight: 2 });
        batch.put_vote(ProposalId::new(1), &voter("b"), VoteRecord { stake: 9, vote_weight: 3 });
        env.commit(batch).unwrap();

        let votes = env.iter_votes(ProposalId::new(1)).unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0], (voter("a"), VoteRecord { stake: 4, vote_weight: 2 }));
        assert_eq!(votes[1], (voter("b"), VoteRecord { stake: 9, vote_weight: 3 }));
    }

    #[test]
    fn test_delete_vote() {
        let (_dir, env) = open_test_env();
        let id = ProposalId::new(0);
        let mut batch = WriteBatch::new();
        batch.put_vote(id, &voter("a"), VoteRecord { stake: 1, vote_weight: 1 });
        env.commit(batch).unwrap();

        let mut batch = WriteBatch::new();
        batch.delete_vote(id, &voter("a"));
        env.commit(batch).unwrap();
        assert!(env.get_vote(id, &voter("a")).unwrap().is_none());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
            let mut batch = WriteBatch::new();
            batch.put_proposal(ProposalId::new(0), &proposal("Durable", 0));
            env.commit(batch).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        assert_eq!(
            env.get_proposal(ProposalId::new(0)).unwrap().unwrap().title,
            "Durable"
        );
    }
}

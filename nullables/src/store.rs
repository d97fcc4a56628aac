//! Nullable store — thread-safe in-memory storage for testing.

use qv_store::{
    MetaStore, ProposalRecord, ProposalStore, StoreError, StoreOp, VoteRecord, VoteStore,
    VotingStore, WriteBatch,
};
use qv_types::{Principal, ProposalId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    proposals: BTreeMap<ProposalId, ProposalRecord>,
    votes: BTreeMap<(ProposalId, Principal), VoteRecord>,
    meta: HashMap<String, Vec<u8>>,
}

/// An in-memory proposal + vote + meta store for testing.
///
/// All three tables live behind one lock so a batch commit is atomic.
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_commits: AtomicU64,
    commits: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fail_commits: AtomicU64::new(0),
            commits: AtomicU64::new(0),
        }
    }

    /// Make the next commit fail without applying anything.
    pub fn fail_next_commit(&self) {
        self.fail_commits.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    /// Overwrite a proposal directly, bypassing the engine. For corrupting
    /// state in audit tests.
    pub fn force_put_proposal(&self, id: ProposalId, record: ProposalRecord) {
        self.tables.lock().unwrap().proposals.insert(id, record);
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalStore for NullStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError> {
        Ok(self.tables.lock().unwrap().proposals.get(&id).cloned())
    }

    fn iter_proposals(&self) -> Result<Vec<(ProposalId, ProposalRecord)>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .proposals
            .iter()
            .map(|(id, p)| (*id, p.clone()))
            .collect())
    }
}

impl VoteStore for NullStore {
    fn get_vote(
        &self,
        proposal: ProposalId,
        voter: &Principal,
    ) -> Result<Option<VoteRecord>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .votes
            .get(&(proposal, voter.clone()))
            .copied())
    }

    fn iter_votes(&self, proposal: ProposalId) -> Result<Vec<(Principal, VoteRecord)>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .votes
            .iter()
            .filter(|((id, _), _)| *id == proposal)
            .map(|((_, voter), vote)| (voter.clone(), *vote))
            .collect())
    }
}

impl MetaStore for NullStore {
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables.lock().unwrap().meta.get(key).cloned())
    }
}

impl VotingStore for NullStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let pending = self.fail_commits.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_commits.store(pending - 1, Ordering::SeqCst);
            return Err(StoreError::Backend("injected commit failure".into()));
        }

        let mut tables = self.tables.lock().unwrap();
        for op in batch.into_ops() {
            match op {
                StoreOp::PutProposal(id, record) => {
                    tables.proposals.insert(id, record);
                }
                StoreOp::PutVote(id, voter, record) => {
                    tables.votes.insert((id, voter), record);
                }
                StoreOp::DeleteVote(id, voter) => {
                    tables.votes.remove(&(id, voter));
                }
                StoreOp::PutMeta(key, value) => {
                    tables.meta.insert(key, value);
                }
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qv_store::meta::keys;
    use qv_types::BlockHeight;

    fn voter(name: &str) -> Principal {
        Principal::parse(name).unwrap()
    }

    fn proposal(title: &str) -> ProposalRecord {
        ProposalRecord {
            title: title.to_string(),
            description: "Description".to_string(),
            creator: voter("wallet_1"),
            created_at: BlockHeight::new(1),
            total_vote_weight: 0,
        }
    }

    #[test]
    fn test_commit_applies_all_ops() {
        let store = NullStore::new();
        let mut batch = WriteBatch::new();
        batch.put_proposal(ProposalId::new(0), &proposal("Test"));
        batch.put_vote(
            ProposalId::new(0),
            &voter("wallet_1"),
            VoteRecord { stake: 9, vote_weight: 3 },
        );
        batch.put_meta_u64(keys::PROPOSAL_COUNT, 1);
        store.commit(batch).unwrap();

        assert_eq!(store.get_proposal(ProposalId::new(0)).unwrap().unwrap().title, "Test");
        assert_eq!(
            store.get_vote(ProposalId::new(0), &voter("wallet_1")).unwrap(),
            Some(VoteRecord { stake: 9, vote_weight: 3 })
        );
        assert_eq!(store.get_meta_u64(keys::PROPOSAL_COUNT).unwrap(), 1);
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn test_injected_failure_applies_nothing() {
        let store = NullStore::new();
        store.fail_next_commit();
        let mut batch = WriteBatch::new();
        batch.put_proposal(ProposalId::new(0), &proposal("Test"));
        batch.put_meta_u64(keys::PROPOSAL_COUNT, 1);
        assert!(store.commit(batch.clone()).is_err());
        assert!(store.get_proposal(ProposalId::new(0)).unwrap().is_none());
        assert_eq!(store.get_meta_u64(keys::PROPOSAL_COUNT).unwrap(), 0);

        // Only one commit was poisoned.
        store.commit(batch).unwrap();
        assert!(store.proposal_exists(ProposalId::new(0)).unwrap());
    }

    #[test]
    fn test_delete_vote() {
        let store = NullStore::new();
        let id = ProposalId::new(0);
        let mut batch = WriteBatch::new();
        batch.put_vote(id, &voter("a"), VoteRecord { stake: 4, vote_weight: 2 });
        batch.put_vote(id, &voter("b"), VoteRecord { stake: 1, vote_weight: 1 });
        store.commit(batch).unwrap();

        let mut batch = WriteBatch::new();
        batch.delete_vote(id, &voter("a"));
        store.commit(batch).unwrap();

        let votes = store.iter_votes(id).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].0, voter("b"));
    }

    #[test]
    fn test_iter_votes_scoped_to_proposal() {
        let store = NullStore::new();
        let mut batch = WriteBatch::new();
        batch.put_vote(ProposalId::new(0), &voter("a"), VoteRecord { stake: 1, vote_weight: 1 });
        batch.put_vote(ProposalId::new(1), &voter("a"), VoteRecord { stake: 4, vote_weight: 2 });
        store.commit(batch).unwrap();
        assert_eq!(store.iter_votes(ProposalId::new(1)).unwrap().len(), 1);
        assert!(store.iter_votes(ProposalId::new(2)).unwrap().is_empty());
    }
}

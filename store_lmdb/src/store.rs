//! Read-side trait implementations.

use heed::RoTxn;

use qv_store::layout::{split_vote_key, vote_key};
use qv_store::{
    MetaStore, ProposalRecord, ProposalStore, StoreError, VoteRecord, VoteStore,
};
use qv_types::{Principal, ProposalId};

use crate::{LmdbEnvironment, LmdbError};

impl LmdbEnvironment {
    fn read_txn(&self) -> Result<RoTxn<'_>, LmdbError> {
        Ok(self.env.read_txn()?)
    }
}

impl ProposalStore for LmdbEnvironment {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, StoreError> {
        let rtxn = self.read_txn()?;
        match self
            .proposals_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                let record = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn iter_proposals(&self) -> Result<Vec<(ProposalId, ProposalRecord)>, StoreError> {
        let rtxn = self.read_txn()?;
        let iter = self.proposals_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let id = ProposalId::from_key(key)
                .ok_or_else(|| StoreError::Corruption("proposal key shorter than 8 bytes".into()))?;
            let record: ProposalRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push((id, record));
        }
        Ok(results)
    }
}

impl VoteStore for LmdbEnvironment {
    fn get_vote(
        &self,
        proposal: ProposalId,
        voter: &Principal,
    ) -> Result<Option<VoteRecord>, StoreError> {
        let key = vote_key(proposal, voter);
        let rtxn = self.read_txn()?;
        match self.votes_db.get(&rtxn, &key).map_err(LmdbError::from)? {
            Some(bytes) => {
                let record = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn iter_votes(&self, proposal: ProposalId) -> Result<Vec<(Principal, VoteRecord)>, StoreError> {
        let prefix = proposal.to_key();
        let rtxn = self.read_txn()?;
        let iter = self
            .votes_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let (_, voter) = split_vote_key(key)?;
            let record: VoteRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push((voter, record));
        }
        Ok(results)
    }
}

impl MetaStore for LmdbEnvironment {
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.read_txn()?;
        let val = self
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(|v| v.to_vec()))
    }
}

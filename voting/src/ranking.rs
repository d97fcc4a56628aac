//! Top-proposals ranking index.
//!
//! A bounded list of the highest-weighted proposals, ordered by descending
//! total vote weight with ties going to the lower (earlier) id. Only proposals
//! with a positive weight are ranked.
//!
//! The index is derived state. Its invariant: it equals the first `capacity`
//! entries of the ordered list of all positive-weight proposals, so it can
//! always be rebuilt from the proposal table with [`TopProposals::rebuild`].
//! Every weight change is applied with [`TopProposals::apply`] in
//! O(capacity); the one case that cannot be settled locally is reported as
//! [`PatchOutcome::NeedsRebuild`].

use qv_store::StoreError;
use qv_types::ProposalId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked proposal and the weight it was ranked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedProposal {
    pub id: ProposalId,
    pub weight: u128,
}

impl RankedProposal {
    /// Ranking order: heavier first, then lower id first.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Result of patching the index for one weight change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The index is consistent.
    Patched,
    /// A ranked proposal fell to the tail (or out) of a full index; an
    /// unranked proposal may now outrank it. The caller must rebuild.
    NeedsRebuild,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProposals {
    capacity: usize,
    entries: Vec<RankedProposal>,
}

impl TopProposals {
    /// Largest number of ranked proposals ever reported.
    pub const MAX_CAPACITY: usize = 10;

    /// An empty index. The capacity is clamped to `1..=MAX_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Self::MAX_CAPACITY);
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Reconstruct the index from `(id, total_vote_weight)` pairs.
    pub fn rebuild(capacity: usize, proposals: impl IntoIterator<Item = (ProposalId, u128)>) -> Self {
        let mut index = Self::new(capacity);
        let mut all: Vec<RankedProposal> = proposals
            .into_iter()
            .filter(|(_, weight)| *weight > 0)
            .map(|(id, weight)| RankedProposal { id, weight })
            .collect();
        all.sort_by(RankedProposal::rank_cmp);
        all.truncate(index.capacity);
        index.entries = all;
        index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn entries(&self) -> &[RankedProposal] {
        &self.entries
    }

    /// Ranked ids, best first.
    pub fn ids(&self) -> Vec<ProposalId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn position(&self, id: ProposalId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Move `id` from `old_weight` to `new_weight`.
    ///
    /// The entry is removed (if ranked) and reinserted at the position that
    /// restores order, then the list is truncated to capacity. An unranked
    /// proposal only enters a full index by outranking its last entry, which
    /// is bumped out.
    pub fn apply(&mut self, id: ProposalId, old_weight: u128, new_weight: u128) -> PatchOutcome {
        let was_full = self.is_full();
        let was_ranked = match self.position(id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        };

        let mut landed_last = true;
        if new_weight > 0 {
            let entry = RankedProposal {
                id,
                weight: new_weight,
            };
            let pos = self
                .entries
                .partition_point(|e| e.rank_cmp(&entry) == Ordering::Less);
            if pos < self.capacity {
                self.entries.insert(pos, entry);
                self.entries.truncate(self.capacity);
                landed_last = pos + 1 == self.entries.len();
            }
        }

        // Every unranked proposal ranks below every ranked one. A shrinking
        // entry that is still ahead of an original entry keeps that true.
        if was_ranked && was_full && new_weight < old_weight && landed_last {
            PatchOutcome::NeedsRebuild
        } else {
            PatchOutcome::Patched
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ProposalId {
        ProposalId::new(raw)
    }

    fn ids(index: &TopProposals) -> Vec<u64> {
        index.ids().iter().map(|i| i.as_u64()).collect()
    }

    #[test]
    fn test_insert_orders_by_weight() {
        let mut index = TopProposals::new(10);
        assert_eq!(index.apply(id(0), 0, 2), PatchOutcome::Patched);
        assert_eq!(index.apply(id(1), 0, 5), PatchOutcome::Patched);
        assert_eq!(index.apply(id(2), 0, 3), PatchOutcome::Patched);
        assert_eq!(ids(&index), vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_go_to_lower_id() {
        let mut index = TopProposals::new(10);
        index.apply(id(4), 0, 3);
        index.apply(id(1), 0, 3);
        index.apply(id(7), 0, 3);
        assert_eq!(ids(&index), vec![1, 4, 7]);
    }

    #[test]
    fn test_zero_weight_is_not_ranked() {
        let mut index = TopProposals::new(10);
        index.apply(id(0), 0, 3);
        index.apply(id(0), 3, 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_reposition_on_increase() {
        let mut index = TopProposals::new(10);
        index.apply(id(0), 0, 5);
        index.apply(id(1), 0, 1);
        index.apply(id(1), 1, 9);
        assert_eq!(ids(&index), vec![1, 0]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_full_index_bumps_last() {
        let mut index = TopProposals::new(3);
        index.apply(id(0), 0, 10);
        index.apply(id(1), 0, 9);
        index.apply(id(2), 0, 8);
        assert!(index.is_full());

        // Too light to enter.
        index.apply(id(3), 0, 7);
        assert_eq!(ids(&index), vec![0, 1, 2]);

        // Tie with the tail but a higher id: stays out.
        index.apply(id(3), 7, 8);
        assert_eq!(ids(&index), vec![0, 1, 2]);

        // Outranks the tail: enters, tail is bumped.
        index.apply(id(3), 8, 9);
        assert_eq!(ids(&index), vec![0, 1, 3]);
    }

    #[test]
    fn test_shrink_inside_full_index_stays_local() {
        let mut index = TopProposals::new(3);
        index.apply(id(0), 0, 10);
        index.apply(id(1), 0, 9);
        index.apply(id(2), 0, 5);
        // Still ahead of the original tail: no outsider can pass it.
        assert_eq!(index.apply(id(0), 10, 8), PatchOutcome::Patched);
        assert_eq!(ids(&index), vec![1, 0, 2]);
    }

    #[test]
    fn test_shrink_to_tail_of_full_index_needs_rebuild() {
        let mut index = TopProposals::new(3);
        index.apply(id(0), 0, 10);
        index.apply(id(1), 0, 9);
        index.apply(id(2), 0, 8);
        assert_eq!(index.apply(id(0), 10, 1), PatchOutcome::NeedsRebuild);
        assert_eq!(index.apply(id(1), 9, 0), PatchOutcome::NeedsRebuild);
    }

    #[test]
    fn test_shrink_in_partial_index_never_needs_rebuild() {
        let mut index = TopProposals::new(3);
        index.apply(id(0), 0, 10);
        index.apply(id(1), 0, 9);
        assert_eq!(index.apply(id(0), 10, 0), PatchOutcome::Patched);
        assert_eq!(ids(&index), vec![1]);
    }

    #[test]
    fn test_rebuild_matches_incremental() {
        let weights = [(0u64, 3u128), (1, 0), (2, 7), (3, 7), (4, 1), (5, 9)];
        let rebuilt = TopProposals::rebuild(4, weights.iter().map(|(i, w)| (id(*i), *w)));
        assert_eq!(ids(&rebuilt), vec![5, 2, 3, 0]);

        let mut incremental = TopProposals::new(4);
        for (i, w) in weights {
            incremental.apply(id(i), 0, w);
        }
        assert_eq!(incremental, rebuilt);
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(TopProposals::new(0).capacity(), 1);
        assert_eq!(TopProposals::new(25).capacity(), TopProposals::MAX_CAPACITY);

        let rebuilt = TopProposals::rebuild(25, (0..12).map(|i| (id(i), 1)));
        assert_eq!(rebuilt.len(), TopProposals::MAX_CAPACITY);
        assert_eq!(ids(&rebuilt), (0..10).collect::<Vec<u64>>());
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut index = TopProposals::new(10);
        index.apply(id(2), 0, 4);
        let decoded = TopProposals::from_bytes(&index.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, index);
        assert!(TopProposals::from_bytes(&[1, 2, 3]).is_err());
    }
}

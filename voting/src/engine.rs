//! The quadratic voting engine: proposal and vote tables plus the ranking.

use crate::audit::{AuditProblem, AuditReport};
use crate::error::VotingError;
use crate::events::VoteEvent;
use crate::params::VotingParams;
use crate::ranking::{PatchOutcome, TopProposals};
use qv_math::vote_weight;
use qv_store::meta::keys;
use qv_store::{ProposalRecord, StoreError, VoteRecord, VotingStore, WriteBatch};
use qv_types::{Clock, Principal, ProposalId};
use tracing::{debug, info, warn};

/// Owns the proposal table, the vote table and the top-proposals index.
///
/// Calls are serialized by `&mut self`. Every mutating call validates its
/// inputs against current state, stages all writes (records, counter, ranking,
/// chain height) in one [`WriteBatch`] and commits it. In-memory state only moves forward
/// after the commit succeeds, so a failed call leaves nothing behind.
pub struct QuadraticVoting<S, C> {
    store: S,
    clock: C,
    params: VotingParams,
    /// Number of proposals created; also the next id to allocate.
    proposal_count: u64,
    ranking: TopProposals,
    events: Vec<VoteEvent>,
}

impl<S: VotingStore, C: Clock> QuadraticVoting<S, C> {
    /// Open the engine over `store`, restoring the counter and ranking.
    ///
    /// A missing ranking, or one saved with a different capacity, is rebuilt
    /// from the proposal table.
    pub fn open(store: S, clock: C, params: VotingParams) -> Result<Self, VotingError> {
        let proposal_count = store.get_meta_u64(keys::PROPOSAL_COUNT)?;
        let saved = match store.get_meta(keys::RANKING)? {
            Some(bytes) => Some(TopProposals::from_bytes(&bytes)?),
            None => None,
        };
        let ranking = match saved {
            Some(r) if r.capacity() == TopProposals::new(params.top_capacity).capacity() => r,
            _ => {
                let rebuilt = rebuild_from(&store, params.top_capacity, None)?;
                debug!(ranked = rebuilt.len(), "rebuilt ranking on open");
                rebuilt
            }
        };

        info!(proposals = proposal_count, ranked = ranking.len(), "voting engine opened");

        Ok(Self {
            store,
            clock,
            params,
            proposal_count,
            ranking,
            events: Vec::new(),
        })
    }

    /// Create a proposal owned by `sender`, stamped with the current height.
    pub fn create_proposal(
        &mut self,
        sender: &Principal,
        title: &str,
        description: &str,
    ) -> Result<ProposalId, VotingError> {
        if let Err(e) = self.validate_text("title", title, self.params.max_title_len)
            .and_then(|_| {
                self.validate_text("description", description, self.params.max_description_len)
            })
        {
            warn!(sender = %sender, code = e.code(), "create-proposal rejected: {e}");
            return Err(e);
        }

        let id = ProposalId::new(self.proposal_count);
        let next_count = id.next().ok_or_else(|| {
            VotingError::InsertFailed(StoreError::Backend("proposal id space exhausted".into()))
        })?;

        let record = ProposalRecord {
            title: title.to_string(),
            description: description.to_string(),
            creator: sender.clone(),
            created_at: self.clock.now(),
            total_vote_weight: 0,
        };

        let mut batch = WriteBatch::new();
        batch.put_proposal(id, &record);
        batch.put_meta_u64(keys::PROPOSAL_COUNT, next_count.as_u64());
        self.commit(batch)?;

        self.proposal_count = next_count.as_u64();
        info!(proposal = %id, creator = %sender, created_at = %record.created_at, "proposal created");
        self.events.push(VoteEvent::ProposalCreated {
            proposal: id,
            creator: sender.clone(),
            created_at: record.created_at,
        });
        Ok(id)
    }

    /// Add `stake` to `sender`'s stake on `proposal` and return the new weight.
    ///
    /// The first vote creates the record; later votes accumulate into it. The
    /// proposal total moves by the weight delta only. `Ok` means the vote
    /// landed; callers that only need success can ignore the weight.
    pub fn vote(
        &mut self,
        sender: &Principal,
        proposal: ProposalId,
        stake: u128,
    ) -> Result<u128, VotingError> {
        let result = self.try_vote(sender, proposal, stake);
        if let Err(e) = &result {
            warn!(sender = %sender, proposal = %proposal, stake, code = e.code(), "vote rejected: {e}");
        }
        result
    }

    fn try_vote(
        &mut self,
        sender: &Principal,
        proposal: ProposalId,
        stake: u128,
    ) -> Result<u128, VotingError> {
        let record = self
            .store
            .get_proposal(proposal)?
            .ok_or(VotingError::InvalidProposal(proposal))?;
        if stake == 0 {
            return Err(VotingError::InvalidAmount {
                amount: stake,
                reason: "stake must be positive",
            });
        }

        let previous = self.store.get_vote(proposal, sender)?;
        let (old_stake, old_weight) = previous.map_or((0, 0), |v| (v.stake, v.vote_weight));
        let new_stake = old_stake
            .checked_add(stake)
            .ok_or(VotingError::InvalidAmount {
                amount: stake,
                reason: "cumulative stake overflows u128",
            })?;
        let new_weight = vote_weight(new_stake);

        let new_total = record
            .total_vote_weight
            .checked_sub(old_weight)
            .ok_or_else(|| drift(proposal, record.total_vote_weight, old_weight))?
            .checked_add(new_weight)
            .ok_or(VotingError::InvalidAmount {
                amount: stake,
                reason: "proposal total weight overflows u128",
            })?;

        let vote = VoteRecord {
            stake: new_stake,
            vote_weight: new_weight,
        };
        let mut batch = WriteBatch::new();
        batch.put_vote(proposal, sender, vote);
        let ranking = self.stage_weight_change(&mut batch, proposal, record, new_total)?;
        self.commit(batch)?;
        self.ranking = ranking;

        info!(
            voter = %sender,
            proposal = %proposal,
            stake,
            total_stake = new_stake,
            weight = new_weight,
            proposal_weight = new_total,
            "vote cast"
        );
        self.events.push(VoteEvent::VoteCast {
            voter: sender.clone(),
            proposal,
            stake,
            total_stake: new_stake,
            weight: new_weight,
        });
        Ok(new_weight)
    }

    /// Remove `sender`'s vote on `proposal` entirely.
    ///
    /// A later vote by the same voter starts from zero stake.
    pub fn withdraw_vote(
        &mut self,
        sender: &Principal,
        proposal: ProposalId,
    ) -> Result<bool, VotingError> {
        let result = self.try_withdraw(sender, proposal);
        if let Err(e) = &result {
            warn!(sender = %sender, proposal = %proposal, code = e.code(), "withdraw-vote rejected: {e}");
        }
        result
    }

    fn try_withdraw(&mut self, sender: &Principal, proposal: ProposalId) -> Result<bool, VotingError> {
        let vote = self
            .store
            .get_vote(proposal, sender)?
            .ok_or_else(|| VotingError::NoStake {
                proposal,
                voter: sender.clone(),
            })?;
        let record = self.store.get_proposal(proposal)?.ok_or_else(|| {
            StoreError::Corruption(format!("vote references missing proposal {}", proposal))
        })?;
        let new_total = record
            .total_vote_weight
            .checked_sub(vote.vote_weight)
            .ok_or_else(|| drift(proposal, record.total_vote_weight, vote.vote_weight))?;

        let mut batch = WriteBatch::new();
        batch.delete_vote(proposal, sender);
        let ranking = self.stage_weight_change(&mut batch, proposal, record, new_total)?;
        self.commit(batch)?;
        self.ranking = ranking;

        info!(
            voter = %sender,
            proposal = %proposal,
            stake = vote.stake,
            weight = vote.vote_weight,
            proposal_weight = new_total,
            "vote withdrawn"
        );
        self.events.push(VoteEvent::VoteWithdrawn {
            voter: sender.clone(),
            proposal,
            stake: vote.stake,
            weight: vote.vote_weight,
        });
        Ok(true)
    }

    /// The only place a proposal's total weight changes. Stages the updated
    /// proposal and the patched ranking into `batch` and returns the ranking
    /// to install once the batch commits.
    fn stage_weight_change(
        &self,
        batch: &mut WriteBatch,
        id: ProposalId,
        mut record: ProposalRecord,
        new_total: u128,
    ) -> Result<TopProposals, VotingError> {
        let old_total = record.total_vote_weight;
        record.total_vote_weight = new_total;
        batch.put_proposal(id, &record);

        let mut ranking = self.ranking.clone();
        if ranking.apply(id, old_total, new_total) == PatchOutcome::NeedsRebuild {
            ranking = rebuild_from(&self.store, self.params.top_capacity, Some((id, new_total)))?;
            debug!(proposal = %id, "ranking rebuilt after weight drop");
        } else {
            debug!(proposal = %id, old_total, new_total, "ranking patched");
        }
        batch.put_meta(keys::RANKING, ranking.to_bytes()?);
        Ok(ranking)
    }

    /// Commit `batch` together with the height the call landed at.
    fn commit(&self, mut batch: WriteBatch) -> Result<(), VotingError> {
        batch.put_meta_u64(keys::CHAIN_HEIGHT, self.clock.now().as_u64());
        self.store.commit(batch)?;
        Ok(())
    }

    fn validate_text(&self, field: &'static str, value: &str, max: usize) -> Result<(), VotingError> {
        if value.is_empty() {
            return Err(VotingError::InvalidText {
                field,
                reason: "must not be empty".into(),
            });
        }
        let len = value.chars().count();
        if len > max {
            return Err(VotingError::InvalidText {
                field,
                reason: format!("{} characters exceeds maximum of {}", len, max),
            });
        }
        Ok(())
    }

    // ── Read-only lookups ───────────────────────────────────────────────

    pub fn get_proposal(&self, id: ProposalId) -> Result<Option<ProposalRecord>, VotingError> {
        Ok(self.store.get_proposal(id)?)
    }

    pub fn get_proposal_count(&self) -> u64 {
        self.proposal_count
    }

    pub fn get_vote(
        &self,
        proposal: ProposalId,
        voter: &Principal,
    ) -> Result<Option<VoteRecord>, VotingError> {
        Ok(self.store.get_vote(proposal, voter)?)
    }

    /// Ranked proposal ids, heaviest first, at most `top_capacity` of them.
    pub fn get_top_proposals(&self) -> Vec<ProposalId> {
        self.ranking.ids()
    }

    pub fn ranking(&self) -> &TopProposals {
        &self.ranking
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<VoteEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recompute every derived value from the primary records and report
    /// anything that disagrees with what is stored.
    pub fn audit(&self) -> Result<AuditReport, VotingError> {
        let mut report = AuditReport::default();
        let proposals = self.store.iter_proposals()?;

        let stored_count = self.store.get_meta_u64(keys::PROPOSAL_COUNT)?;
        let contiguous = proposals
            .iter()
            .enumerate()
            .all(|(i, (id, _))| id.as_u64() == i as u64);
        if stored_count != proposals.len() as u64 || !contiguous || stored_count != self.proposal_count {
            report.problems.push(AuditProblem::CountMismatch {
                counter: stored_count,
                proposals: proposals.len() as u64,
            });
        }

        for (id, record) in &proposals {
            report.proposals_checked += 1;
            let mut recomputed: u128 = 0;
            for (voter, vote) in self.store.iter_votes(*id)? {
                report.votes_checked += 1;
                if vote.stake == 0 {
                    report.problems.push(AuditProblem::ZeroStake {
                        proposal: *id,
                        voter: voter.clone(),
                    });
                }
                if vote.vote_weight != vote_weight(vote.stake) {
                    report.problems.push(AuditProblem::VoteWeightMismatch {
                        proposal: *id,
                        voter,
                        stake: vote.stake,
                        stored: vote.vote_weight,
                    });
                }
                recomputed = recomputed.saturating_add(vote.vote_weight);
            }
            if recomputed != record.total_vote_weight {
                report.problems.push(AuditProblem::TotalWeightMismatch {
                    proposal: *id,
                    stored: record.total_vote_weight,
                    recomputed,
                });
            }
        }

        let expected = TopProposals::rebuild(
            self.params.top_capacity,
            proposals.iter().map(|(id, p)| (*id, p.total_vote_weight)),
        );
        if expected.entries() != self.ranking.entries() {
            report.problems.push(AuditProblem::RankingMismatch {
                stored: self.ranking.ids(),
                expected: expected.ids(),
            });
        }

        if report.is_clean() {
            debug!(
                proposals = report.proposals_checked,
                votes = report.votes_checked,
                "audit clean"
            );
        } else {
            warn!(problems = report.problems.len(), "audit found inconsistencies");
        }
        Ok(report)
    }
}

/// Rebuild the ranking from the proposal table, substituting `override_weight`
/// for a proposal whose new total is staged but not yet committed.
fn rebuild_from<S: VotingStore>(
    store: &S,
    capacity: usize,
    override_weight: Option<(ProposalId, u128)>,
) -> Result<TopProposals, VotingError> {
    let proposals = store.iter_proposals()?;
    Ok(TopProposals::rebuild(
        capacity,
        proposals.into_iter().map(|(id, p)| match override_weight {
            Some((target, weight)) if target == id => (id, weight),
            _ => (id, p.total_vote_weight),
        }),
    ))
}

fn drift(proposal: ProposalId, total: u128, vote_weight: u128) -> VotingError {
    VotingError::InsertFailed(StoreError::Corruption(format!(
        "proposal {} total weight {} is below a live vote weight {}",
        proposal, total, vote_weight
    )))
}

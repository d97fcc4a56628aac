//! Quadratic voting over a set of proposals.
//!
//! A voter's influence on a proposal is `⌊√stake⌋` of the cumulative stake
//! they committed to it, so doubling a stake buys only ~1.41× the weight.
//!
//! This crate handles:
//! - Proposal creation with sequential ids and logical-time stamps
//! - Cumulative voting and full withdrawal, with weight deltas applied to the
//!   proposal's total
//! - A bounded top-proposals ranking kept in step with every weight change
//! - Audit of every cross-table invariant
//!
//! Storage and the block-height source are supplied by the caller through
//! `qv-store` and [`qv_types::Clock`]. Each mutating call is validated in full
//! before anything is written, then committed as one atomic batch.

pub mod audit;
pub mod engine;
pub mod error;
pub mod events;
pub mod params;
pub mod ranking;

pub use audit::{AuditProblem, AuditReport};
pub use engine::QuadraticVoting;
pub use error::VotingError;
pub use events::VoteEvent;
pub use params::VotingParams;
pub use qv_store::{ProposalRecord, VoteRecord};
pub use ranking::{PatchOutcome, RankedProposal, TopProposals};

//! Abstract storage for the quadratic voting record store.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The voting engine depends only on the traits.
//!
//! Reads go through [`ProposalStore`], [`VoteStore`] and [`MetaStore`]. Writes
//! are never issued one at a time: a mutating call collects its changes into a
//! [`WriteBatch`] and hands the whole batch to [`VotingStore::commit`], which
//! applies every operation or none of them.

pub mod batch;
pub mod error;
pub mod layout;
pub mod meta;
pub mod proposal;
pub mod vote;

pub use batch::{StoreOp, WriteBatch};
pub use error::StoreError;
pub use meta::MetaStore;
pub use proposal::{ProposalRecord, ProposalStore};
pub use vote::{VoteRecord, VoteStore};

/// A complete backend: all read traits plus atomic batch commit.
pub trait VotingStore: ProposalStore + VoteStore + MetaStore {
    /// Apply every operation in `batch` atomically.
    ///
    /// On error nothing from the batch is visible to subsequent reads.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

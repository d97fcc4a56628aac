//! LMDB storage backend for quadratic voting.
//!
//! Implements the traits from `qv-store` using the `heed` LMDB bindings.
//! Three named databases live in one environment:
//!
//! | database    | key                                  | value                      |
//! |-------------|--------------------------------------|----------------------------|
//! | `proposals` | proposal id, 8 bytes big-endian      | bincode `ProposalRecord`   |
//! | `votes`     | proposal id (8 bytes BE) ++ voter    | bincode `VoteRecord`       |
//! | `meta`      | utf-8 key name                       | raw bytes                  |
//!
//! A [`qv_store::WriteBatch`] is applied inside a single LMDB write
//! transaction, so a mutating call lands entirely or not at all.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod migration;
pub mod store;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};

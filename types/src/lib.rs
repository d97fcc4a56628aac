//! Fundamental types for the quadratic voting workspace.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! caller identities, proposal identifiers and the logical clock used to stamp
//! proposal creation.

pub mod error;
pub mod id;
pub mod principal;
pub mod time;

pub use error::TypeError;
pub use id::ProposalId;
pub use principal::Principal;
pub use time::{BlockHeight, Clock};

//! Tunable limits.

use serde::{Deserialize, Serialize};

/// Limits applied by the voting engine.
///
/// Text lengths are counted in Unicode scalar values, not bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingParams {
    /// Longest accepted proposal title.
    pub max_title_len: usize,
    /// Longest accepted proposal description.
    pub max_description_len: usize,
    /// Number of entries kept in the top-proposals ranking, clamped to 1..=10.
    pub top_capacity: usize,
}

impl VotingParams {
    pub const DEFAULT_MAX_TITLE_LEN: usize = 100;
    pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 500;
    pub const DEFAULT_TOP_CAPACITY: usize = 10;
}

impl Default for VotingParams {
    fn default() -> Self {
        Self {
            max_title_len: Self::DEFAULT_MAX_TITLE_LEN,
            max_description_len: Self::DEFAULT_MAX_DESCRIPTION_LEN,
            top_capacity: Self::DEFAULT_TOP_CAPACITY,
        }
    }
}

//! Nullable clock — deterministic block height for testing.

use qv_types::{BlockHeight, Clock};
use std::cell::Cell;

/// A deterministic block height source for testing.
///
/// Height only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_height: u64) -> Self {
        Self {
            current: Cell::new(initial_height),
        }
    }

    /// Advance by a number of blocks, saturating at `u64::MAX`.
    pub fn advance(&self, blocks: u64) {
        self.current.set(self.current.get().saturating_add(blocks));
    }
}

impl Default for NullClock {
    /// Starts at height 1, the first block a contract call can land in.
    fn default() -> Self {
        Self::new(1)
    }
}

impl Clock for NullClock {
    fn now(&self) -> BlockHeight {
        BlockHeight::new(self.current.get())
    }
}

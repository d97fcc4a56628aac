//! Logical time.
//!
//! Proposals are stamped with the height of the enclosing block, never with
//! wall-clock time. The height source belongs to the execution environment and
//! is reached only through the [`Clock`] trait.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block height: a monotonic logical timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The following height, saturating at `u64::MAX`.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of the current logical time.
pub trait Clock {
    fn now(&self) -> BlockHeight;
}

/// A fixed height is a clock that never advances.
impl Clock for BlockHeight {
    fn now(&self) -> BlockHeight {
        *self
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> BlockHeight {
        (**self).now()
    }
}

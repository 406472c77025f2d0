//! Time index supplied by the host environment.
//!
//! The ledger never reads a wall clock. The host advances a monotonically
//! increasing block counter; every index strictly below the current one is
//! considered finalized.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block number (time index).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockNumber(u64);

impl BlockNumber {
    /// The first block.
    pub const GENESIS: Self = Self(0);

    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The following block, or `None` past the last representable index.
    pub fn checked_next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Whether this block is final relative to the current open block.
    pub fn is_finalized(&self, current: BlockNumber) -> bool {
        self.0 < current.0
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

//! Token snapshots: the full ledger state at a block, for persistence.
//!
//! A snapshot carries the balance ledger, the delegation graph and every
//! checkpoint history, so historical vote queries keep working after a
//! restore. Restoring re-checks the ledger invariants before handing back
//! a controller.

use nbt_governance::{CheckpointStore, DelegationGraph};
use nbt_ledger::BalanceLedger;
use nbt_types::BlockNumber;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenSnapshot {
    /// Snapshot version for compatibility.
    pub version: u32,
    /// Open block at the time the snapshot was taken.
    pub block: BlockNumber,
    ledger: BalanceLedger,
    delegation: DelegationGraph,
    checkpoints: CheckpointStore,
}

impl TokenSnapshot {
    pub(crate) fn new(
        block: BlockNumber,
        ledger: BalanceLedger,
        delegation: DelegationGraph,
        checkpoints: CheckpointStore,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            block,
            ledger,
            delegation,
            checkpoints,
        }
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    pub fn holder_count(&self) -> usize {
        self.ledger.holders().count()
    }

    pub fn delegation_count(&self) -> usize {
        self.delegation.len()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, TokenError> {
        bincode::serialize(self).map_err(|e| TokenError::Snapshot(e.to_string()))
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| TokenError::Snapshot(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), TokenError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(TokenError::Snapshot(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                self.version
            )));
        }
        Ok(())
    }

    pub(crate) fn into_parts(
        self,
    ) -> Result<(BlockNumber, BalanceLedger, DelegationGraph, CheckpointStore), TokenError> {
        self.check_version()?;
        Ok((self.block, self.ledger, self.delegation, self.checkpoints))
    }
}

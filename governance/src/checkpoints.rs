//! Per-delegate voting-power history.
//!
//! Each delegate owns a `Vec<Checkpoint>` sorted by strictly increasing
//! `from_block`. A write at the same block as the latest entry overwrites it;
//! a write at a later block appends. Nothing is ever removed, so the vote
//! total of any delegate at any finalized block can be recovered with one
//! binary search.

use crate::error::GovernanceError;
use nbt_types::{AccountId, BlockNumber, Delta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vote total of a delegate from `from_block` until the next checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub from_block: BlockNumber,
    pub votes: u128,
}

/// A validated checkpoint write, produced by [`CheckpointStore::prepare_move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct PendingCheckpoint {
    delegate: AccountId,
    at: BlockNumber,
    previous: u128,
    votes: u128,
}

impl PendingCheckpoint {
    pub fn delegate(&self) -> AccountId {
        self.delegate
    }

    pub fn votes(&self) -> u128 {
        self.votes
    }
}

/// Outcome of a committed checkpoint write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotesChanged {
    pub delegate: AccountId,
    pub previous: u128,
    pub new: u128,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckpointStore {
    histories: HashMap<AccountId, Vec<Checkpoint>>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Votes of the most recent checkpoint, or 0.
    pub fn get_votes(&self, delegate: &AccountId) -> u128 {
        self.latest(delegate).map(|c| c.votes).unwrap_or(0)
    }

    pub fn latest(&self, delegate: &AccountId) -> Option<&Checkpoint> {
        self.histories.get(delegate).and_then(|h| h.last())
    }

    pub fn num_checkpoints(&self, delegate: &AccountId) -> usize {
        self.histories.get(delegate).map_or(0, Vec::len)
    }

    pub fn checkpoints(&self, delegate: &AccountId) -> &[Checkpoint] {
        self.histories.get(delegate).map_or(&[], Vec::as_slice)
    }

    /// Every account that has ever held a checkpoint.
    pub fn delegates(&self) -> impl Iterator<Item = &AccountId> {
        self.histories.keys()
    }

    /// Votes of `delegate` at a finalized block.
    ///
    /// Fails with `FutureIndex` unless `at < current`: the current block is
    /// still open and its totals may change.
    pub fn get_prior_votes(
        &self,
        delegate: &AccountId,
        at: BlockNumber,
        current: BlockNumber,
    ) -> Result<u128, GovernanceError> {
        if !at.is_finalized(current) {
            return Err(GovernanceError::FutureIndex {
                requested: at,
                current,
            });
        }
        Ok(self.votes_at(delegate, at))
    }

    /// Votes of the checkpoint with the greatest `from_block <= at`, or 0.
    pub fn votes_at(&self, delegate: &AccountId, at: BlockNumber) -> u128 {
        let history = self.checkpoints(delegate);
        match (history.first(), history.last()) {
            (Some(_), Some(last)) if last.from_block <= at => last.votes,
            (Some(first), _) if first.from_block > at => 0,
            (None, _) | (_, None) => 0,
            _ => {
                let idx = history.partition_point(|c| c.from_block <= at);
                history[idx - 1].votes
            }
        }
    }

    /// Validate applying `delta` to `delegate`'s total at block `at`.
    ///
    /// Reads only the committed state: two pending writes for the same
    /// delegate must not be prepared together.
    pub fn prepare_move(
        &self,
        delegate: &AccountId,
        delta: Delta,
        at: BlockNumber,
    ) -> Result<PendingCheckpoint, GovernanceError> {
        let previous = match self.latest(delegate) {
            Some(last) if at < last.from_block => {
                return Err(GovernanceError::TimeRegression {
                    at,
                    last: last.from_block,
                });
            }
            Some(last) => last.votes,
            None => 0,
        };
        let votes = delta.apply(previous)?;
        Ok(PendingCheckpoint {
            delegate: *delegate,
            at,
            previous,
            votes,
        })
    }

    /// Commit a prepared write: overwrite the latest checkpoint if it sits at
    /// the same block, append otherwise.
    pub fn commit(&mut self, pending: PendingCheckpoint) -> VotesChanged {
        let history = self.histories.entry(pending.delegate).or_default();
        match history.last_mut() {
            Some(last) if last.from_block == pending.at => last.votes = pending.votes,
            _ => {
                debug_assert!(history.last().map_or(true, |l| l.from_block < pending.at));
                history.push(Checkpoint {
                    from_block: pending.at,
                    votes: pending.votes,
                });
            }
        }
        tracing::trace!(
            delegate = %pending.delegate,
            block = pending.at.as_u64(),
            previous = pending.previous,
            votes = pending.votes,
            "checkpoint written"
        );
        VotesChanged {
            delegate: pending.delegate,
            previous: pending.previous,
            new: pending.votes,
        }
    }

    /// Prepare and commit in one step.
    pub fn move_votes(
        &mut self,
        delegate: &AccountId,
        delta: Delta,
        at: BlockNumber,
    ) -> Result<VotesChanged, GovernanceError> {
        let pending = self.prepare_move(delegate, delta, at)?;
        Ok(self.commit(pending))
    }

    /// Check that every history is strictly increasing in block.
    pub fn is_well_ordered(&self) -> bool {
        self.histories
            .values()
            .all(|h| h.windows(2).all(|w| w[0].from_block < w[1].from_block))
    }
}

//! Voting power for the NanoByte token.
//!
//! Two pieces:
//! - [`DelegationGraph`]: which delegate each account's weight accrues to.
//! - [`CheckpointStore`]: per-delegate, append-only history of vote totals,
//!   queryable at any finalized block in O(log k).
//!
//! Key principle: weight is balance-weighted and single-hop. An account's
//! whole balance counts for exactly one delegate (or nobody, before it ever
//! delegates); delegates do not forward weight they receive.

pub mod checkpoints;
pub mod delegation;
pub mod error;

pub use checkpoints::{Checkpoint, CheckpointStore, PendingCheckpoint, VotesChanged};
pub use delegation::{DelegationGraph, DelegationSnapshot};
pub use error::GovernanceError;

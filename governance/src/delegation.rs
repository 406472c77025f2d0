//! Vote delegation: which delegate an account's balance counts for.
//!
//! Supports:
//! - **Lazy relations**: an account has no delegate until it delegates
//! - **Self-delegation**, the usual first step for a holder who votes
//! - **Clearing** by delegating to the null account
//! - A **reverse index** from delegate to direct delegators, rebuilt on
//!   deserialization
//!
//! This graph holds relations only. Moving the weight that goes with a
//! relation change is the caller's job, done through the
//! [`crate::CheckpointStore`] in the same step.

use nbt_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "DelegationSnapshot", into = "DelegationSnapshot")]
pub struct DelegationGraph {
    /// delegator → delegate.
    delegations: HashMap<AccountId, AccountId>,
    /// Reverse index: delegate → set of direct delegators.
    reverse_delegations: HashMap<AccountId, HashSet<AccountId>>,
}

impl DelegationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `account` at `new_delegate`. Returns the previous delegate.
    ///
    /// Delegating to the null account clears the relation.
    pub fn delegate(
        &mut self,
        account: &AccountId,
        new_delegate: &AccountId,
    ) -> Option<AccountId> {
        if new_delegate.is_zero() {
            return self.undelegate(account);
        }
        let previous = self.delegations.insert(*account, *new_delegate);
        if let Some(old) = previous {
            self.unlink(account, &old);
        }
        self.reverse_delegations
            .entry(*new_delegate)
            .or_default()
            .insert(*account);
        previous
    }

    /// Remove `account`'s delegation. Returns the previous delegate.
    pub fn undelegate(&mut self, account: &AccountId) -> Option<AccountId> {
        let previous = self.delegations.remove(account);
        if let Some(old) = previous {
            self.unlink(account, &old);
        }
        previous
    }

    /// Current delegate of `account` (None if it never delegated).
    pub fn delegate_of(&self, account: &AccountId) -> Option<AccountId> {
        self.delegations.get(account).copied()
    }

    /// Direct delegators of `delegate`, sorted.
    pub fn delegators(&self, delegate: &AccountId) -> Vec<AccountId> {
        let mut out: Vec<AccountId> = self
            .reverse_delegations
            .get(delegate)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        out.sort();
        out
    }

    /// All `(delegator, delegate)` pairs.
    pub fn delegations(&self) -> impl Iterator<Item = (&AccountId, &AccountId)> {
        self.delegations.iter()
    }

    pub fn len(&self) -> usize {
        self.delegations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegations.is_empty()
    }

    fn unlink(&mut self, account: &AccountId, old: &AccountId) {
        if let Some(set) = self.reverse_delegations.get_mut(old) {
            set.remove(account);
            if set.is_empty() {
                self.reverse_delegations.remove(old);
            }
        }
    }
}

/// Serializable form of the graph; the reverse index is rebuilt on load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DelegationSnapshot {
    pub delegations: HashMap<AccountId, AccountId>,
}

impl From<DelegationSnapshot> for DelegationGraph {
    fn from(snapshot: DelegationSnapshot) -> Self {
        let mut reverse = HashMap::<AccountId, HashSet<AccountId>>::new();
        for (from, to) in &snapshot.delegations {
            reverse.entry(*to).or_default().insert(*from);
        }
        Self {
            delegations: snapshot.delegations,
            reverse_delegations: reverse,
        }
    }
}

impl From<DelegationGraph> for DelegationSnapshot {
    fn from(graph: DelegationGraph) -> Self {
        Self {
            delegations: graph.delegations,
        }
    }
}

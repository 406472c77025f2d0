//! Spending allowances: `(owner, spender) → amount`.

use crate::error::LedgerError;
use nbt_types::{arith, AccountId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An allowance of `u128::MAX` is unlimited and is never decremented.
pub const UNLIMITED: u128 = u128::MAX;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Allowances {
    entries: HashMap<(AccountId, AccountId), u128>,
}

/// A validated allowance spend, ready to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct AllowanceChange {
    pub owner: AccountId,
    pub spender: AccountId,
    /// Remaining allowance after the spend; `None` when unlimited.
    pub remaining: Option<u128>,
}

impl Allowances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.entries.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Set the allowance outright. Zero removes the entry.
    pub fn set(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if spender.is_zero() {
            return Err(LedgerError::InvalidSpender);
        }
        if amount == 0 {
            self.entries.remove(&(*owner, *spender));
        } else {
            self.entries.insert((*owner, *spender), amount);
        }
        Ok(())
    }

    /// Validate that `spender` may move `amount` out of `owner`'s balance.
    pub fn prepare_spend(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<AllowanceChange, LedgerError> {
        let available = self.get(owner, spender);
        if available == UNLIMITED {
            return Ok(AllowanceChange {
                owner: *owner,
                spender: *spender,
                remaining: None,
            });
        }
        let remaining = arith::checked_sub(available, amount).map_err(|_| {
            LedgerError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                needed: amount,
                available,
            }
        })?;
        Ok(AllowanceChange {
            owner: *owner,
            spender: *spender,
            remaining: Some(remaining),
        })
    }

    pub fn apply(&mut self, change: AllowanceChange) {
        let key = (change.owner, change.spender);
        match change.remaining {
            None => {}
            Some(0) => {
                self.entries.remove(&key);
            }
            Some(remaining) => {
                self.entries.insert(key, remaining);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(seed: u8) -> AccountId {
        AccountId::repeat_byte(seed)
    }

    #[test]
    fn unset_allowance_is_zero() {
        let a = Allowances::new();
        assert_eq!(a.get(&acct(1), &acct(2)), 0);
    }

    #[test]
    fn spend_decrements() {
        let mut a = Allowances::new();
        a.set(&acct(1), &acct(2), 100).unwrap();
        let change = a.prepare_spend(&acct(1), &acct(2), 40).unwrap();
        assert_eq!(change.remaining, Some(60));
        a.apply(change);
        assert_eq!(a.get(&acct(1), &acct(2)), 60);
    }

    #[test]
    fn spend_to_zero_removes_entry() {
        let mut a = Allowances::new();
        a.set(&acct(1), &acct(2), 10).unwrap();
        let change = a.prepare_spend(&acct(1), &acct(2), 10).unwrap();
        a.apply(change);
        assert!(a.is_empty());
    }

    #[test]
    fn overspend_rejected() {
        let mut a = Allowances::new();
        a.set(&acct(1), &acct(2), 10).unwrap();
        let err = a.prepare_spend(&acct(1), &acct(2), 11).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientAllowance {
                needed: 11,
                available: 10,
                ..
            }
        ));
    }

    #[test]
    fn unlimited_is_never_decremented() {
        let mut a = Allowances::new();
        a.set(&acct(1), &acct(2), UNLIMITED).unwrap();
        let change = a.prepare_spend(&acct(1), &acct(2), 1_000).unwrap();
        assert_eq!(change.remaining, None);
        a.apply(change);
        assert_eq!(a.get(&acct(1), &acct(2)), UNLIMITED);
    }

    #[test]
    fn null_spender_rejected() {
        let mut a = Allowances::new();
        assert_eq!(
            a.set(&acct(1), &AccountId::ZERO, 5),
            Err(LedgerError::InvalidSpender)
        );
    }

    #[test]
    fn setting_zero_clears() {
        let mut a = Allowances::new();
        a.set(&acct(1), &acct(2), 5).unwrap();
        a.set(&acct(1), &acct(2), 0).unwrap();
        assert_eq!(a.len(), 0);
    }
}

//! Per-account balances, total supply, cap and the owner role.

use crate::allowance::{AllowanceChange, Allowances};
use crate::error::LedgerError;
use nbt_types::{arith, AccountId, ArithmeticError, TokenParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which way value moves in a [`BalanceChange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceMove {
    Mint { to: AccountId },
    Burn { from: AccountId },
    Transfer { from: AccountId, to: AccountId },
}

impl BalanceMove {
    /// Account whose balance (and therefore delegated weight) decreases.
    pub fn source(&self) -> Option<AccountId> {
        match self {
            Self::Mint { .. } => None,
            Self::Burn { from } | Self::Transfer { from, .. } => Some(*from),
        }
    }

    /// Account whose balance increases.
    pub fn destination(&self) -> Option<AccountId> {
        match self {
            Self::Mint { to } | Self::Transfer { to, .. } => Some(*to),
            Self::Burn { .. } => None,
        }
    }
}

/// A validated balance mutation. Applying it cannot fail.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct BalanceChange {
    pub movement: BalanceMove,
    pub amount: u128,
    writes: Vec<(AccountId, u128)>,
    total_supply: u128,
}

/// The balance ledger.
///
/// Invariant: `Σ balances == total_supply <= params.cap`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalanceLedger {
    params: TokenParams,
    /// `None` once ownership has been renounced.
    owner: Option<AccountId>,
    balances: HashMap<AccountId, u128>,
    total_supply: u128,
    allowances: Allowances,
}

impl BalanceLedger {
    pub fn new(params: TokenParams, owner: AccountId) -> Self {
        Self {
            params,
            owner: Some(owner),
            balances: HashMap::new(),
            total_supply: 0,
            allowances: Allowances::new(),
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn params(&self) -> &TokenParams {
        &self.params
    }

    pub fn cap(&self) -> u128 {
        self.params.cap
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn owner(&self) -> Option<AccountId> {
        self.owner
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances.get(owner, spender)
    }

    /// All accounts with a non-zero balance.
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, &u128)> {
        self.balances.iter()
    }

    // ── Owner role ─────────────────────────────────────────────────────

    pub fn ensure_owner(&self, caller: &AccountId) -> Result<(), LedgerError> {
        match self.owner {
            Some(owner) if owner == *caller => Ok(()),
            _ => Err(LedgerError::Unauthorized { caller: *caller }),
        }
    }

    /// Hand the owner role to `new_owner`. Returns the previous owner.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<AccountId, LedgerError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(LedgerError::InvalidOwner);
        }
        self.owner = Some(*new_owner);
        Ok(*caller)
    }

    /// Give up the owner role for good. Nobody can mint afterwards.
    pub fn renounce_ownership(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.owner = None;
        Ok(())
    }

    // ── Staged mutations ───────────────────────────────────────────────

    /// Validate minting `amount` to `to` on behalf of `caller`.
    pub fn prepare_mint(
        &self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<BalanceChange, LedgerError> {
        self.ensure_owner(caller)?;
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        let total_supply = arith::checked_add_capped(self.total_supply, amount, self.params.cap)
            .map_err(|e| match e {
                ArithmeticError::CapExceeded { cap } => LedgerError::CapExceeded {
                    requested: amount,
                    supply: self.total_supply,
                    cap,
                },
                other => LedgerError::Arithmetic(other),
            })?;
        let to_balance = arith::checked_add(self.balance_of(to), amount)?;
        Ok(BalanceChange {
            movement: BalanceMove::Mint { to: *to },
            amount,
            writes: vec![(*to, to_balance)],
            total_supply,
        })
    }

    /// Validate `from` burning `amount` of its own balance.
    pub fn prepare_burn(
        &self,
        from: &AccountId,
        amount: u128,
    ) -> Result<BalanceChange, LedgerError> {
        let from_balance = self.debit(from, amount)?;
        let total_supply = arith::checked_sub(self.total_supply, amount)?;
        Ok(BalanceChange {
            movement: BalanceMove::Burn { from: *from },
            amount,
            writes: vec![(*from, from_balance)],
            total_supply,
        })
    }

    /// Validate moving `amount` from `from` to `to`.
    pub fn prepare_transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<BalanceChange, LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        let from_balance = self.debit(from, amount)?;
        let writes = if from == to {
            Vec::new()
        } else {
            let to_balance = arith::checked_add(self.balance_of(to), amount)?;
            vec![(*from, from_balance), (*to, to_balance)]
        };
        Ok(BalanceChange {
            movement: BalanceMove::Transfer {
                from: *from,
                to: *to,
            },
            amount,
            writes,
            total_supply: self.total_supply,
        })
    }

    /// Validate `spender` moving `amount` out of `owner`'s allowance.
    pub fn prepare_spend_allowance(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<AllowanceChange, LedgerError> {
        self.allowances.prepare_spend(owner, spender, amount)
    }

    /// Commit a staged balance change.
    pub fn apply(&mut self, change: BalanceChange) {
        tracing::trace!(
            movement = ?change.movement,
            amount = change.amount,
            supply = change.total_supply,
            "applying balance change"
        );
        for (account, balance) in change.writes {
            if balance == 0 {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, balance);
            }
        }
        self.total_supply = change.total_supply;
    }

    pub fn apply_allowance(&mut self, change: AllowanceChange) {
        self.allowances.apply(change);
    }

    pub fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.allowances.set(owner, spender, amount)
    }

    // ── One-shot mutations ─────────────────────────────────────────────

    pub fn mint(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let change = self.prepare_mint(caller, to, amount)?;
        self.apply(change);
        Ok(())
    }

    pub fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let change = self.prepare_burn(from, amount)?;
        self.apply(change);
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let change = self.prepare_transfer(from, to, amount)?;
        self.apply(change);
        Ok(())
    }

    /// Recompute the supply from the balance map.
    pub fn sum_of_balances(&self) -> Option<u128> {
        self.balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
    }

    fn debit(&self, account: &AccountId, amount: u128) -> Result<u128, LedgerError> {
        let available = self.balance_of(account);
        arith::checked_sub(available, amount).map_err(|_| LedgerError::InsufficientBalance {
            account: *account,
            needed: amount,
            available,
        })
    }
}

//! Thread-safe handle around a [`TokenController`].
//!
//! Reads run concurrently, mutations are serialized behind a single writer.
//! Each operation holds the lock for its whole prepare/commit sequence, so
//! no reader ever observes a half-applied operation.

use nbt_types::{AccountId, BlockNumber};
use std::sync::{Arc, PoisonError, RwLock};

use crate::controller::TokenController;
use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::snapshot::TokenSnapshot;

#[derive(Clone)]
pub struct SharedToken {
    inner: Arc<RwLock<TokenController>>,
}

impl SharedToken {
    pub fn new(controller: TokenController) -> Self {
        Self {
            inner: Arc::new(RwLock::new(controller)),
        }
    }

    /// Run `f` with shared access.
    ///
    /// A poisoned lock is recovered: operations never leave partial writes
    /// behind, so the state is consistent even if a holder panicked.
    pub fn read<R>(&self, f: impl FnOnce(&TokenController) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut TokenController) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.read(|t| t.balance_of(account))
    }

    pub fn total_supply(&self) -> u128 {
        self.read(|t| t.total_supply())
    }

    pub fn get_current_votes(&self, account: &AccountId) -> u128 {
        self.read(|t| t.get_current_votes(account))
    }

    pub fn get_prior_votes(
        &self,
        account: &AccountId,
        block: BlockNumber,
    ) -> Result<u128, TokenError> {
        self.read(|t| t.get_prior_votes(account, block))
    }

    pub fn mint(&self, caller: &AccountId, amount: u128) -> Result<Vec<TokenEvent>, TokenError> {
        self.write(|t| t.mint(caller, amount))
    }

    pub fn mint_to(
        &self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.write(|t| t.mint_to(caller, to, amount))
    }

    pub fn burn(&self, caller: &AccountId, amount: u128) -> Result<Vec<TokenEvent>, TokenError> {
        self.write(|t| t.burn(caller, amount))
    }

    pub fn transfer(
        &self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.write(|t| t.transfer(caller, to, amount))
    }

    pub fn approve(
        &self,
        caller: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.write(|t| t.approve(caller, spender, amount))
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.read(|t| t.allowance(owner, spender))
    }

    pub fn transfer_from(
        &self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.write(|t| t.transfer_from(caller, from, to, amount))
    }

    pub fn delegate(
        &self,
        caller: &AccountId,
        delegatee: &AccountId,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.write(|t| t.delegate(caller, delegatee))
    }

    pub fn advance_block(&self) -> Result<BlockNumber, TokenError> {
        self.write(|t| t.advance_block())
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        self.read(|t| t.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbt_types::TokenParams;
    use std::thread;

    #[test]
    fn concurrent_transfers_keep_invariants() {
        let owner = AccountId::repeat_byte(0x0A);
        let mut controller = TokenController::new(TokenParams::with_cap(1_000_000), owner);
        controller.mint(&owner, 100_000).unwrap();
        controller.delegate(&owner, &owner).unwrap();
        let shared = SharedToken::new(controller);

        let handles: Vec<_> = (1u8..=8)
            .map(|i| {
                let token = shared.clone();
                thread::spawn(move || {
                    let holder = AccountId::repeat_byte(i);
                    token.delegate(&holder, &holder).unwrap();
                    for _ in 0..50 {
                        token.transfer(&owner, &holder, 10).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(shared.balance_of(&owner), 100_000 - 8 * 500);
        assert_eq!(shared.get_current_votes(&owner), 96_000);
        assert_eq!(shared.get_current_votes(&AccountId::repeat_byte(3)), 500);
        assert_eq!(shared.total_supply(), 100_000);
        shared.read(|t| t.check_invariants()).unwrap();
    }

    #[test]
    fn clones_share_state() {
        let owner = AccountId::repeat_byte(0x0A);
        let a = SharedToken::new(TokenController::new(TokenParams::with_cap(100), owner));
        let b = a.clone();
        a.write(|t| t.mint(&owner, 7)).unwrap();
        assert_eq!(b.balance_of(&owner), 7);
        assert_eq!(b.advance_block(), Ok(BlockNumber::new(1)));
        assert_eq!(a.read(|t| t.current_block()), BlockNumber::new(1));
        assert_eq!(b.snapshot().total_supply(), 7);
    }

    #[test]
    fn supply_and_allowance_operations() {
        let owner = AccountId::repeat_byte(0x0A);
        let holder = AccountId::repeat_byte(0xA1);
        let spender = AccountId::repeat_byte(0x5E);
        let token = SharedToken::new(TokenController::new(TokenParams::with_cap(1_000), owner));

        token.mint(&owner, 300).unwrap();
        token.mint_to(&owner, &holder, 200).unwrap();
        assert!(token.mint_to(&holder, &holder, 1).is_err());
        token.burn(&owner, 100).unwrap();
        assert_eq!(token.total_supply(), 400);

        token.delegate(&holder, &holder).unwrap();
        token.approve(&holder, &spender, 150).unwrap();
        token.transfer_from(&spender, &holder, &owner, 120).unwrap();
        assert_eq!(token.allowance(&holder, &spender), 30);
        assert_eq!(token.balance_of(&owner), 320);
        assert_eq!(token.get_current_votes(&holder), 80);
        token.read(|t| t.check_invariants()).unwrap();
    }
}

//! Orchestrates the balance ledger, delegation graph and checkpoint store.
//!
//! Sequencing per operation:
//! - `mint` / `mint_to` → stage mint → `+amt` for `delegate_of(to)`
//! - `burn` → stage burn → `-amt` for `delegate_of(caller)`
//! - `transfer` / `transfer_from` → stage transfer → `-amt` for the
//!   sender's delegate, `+amt` for the recipient's delegate
//! - `delegate` → `-balance` for the old delegate, `+balance` for the new
//!
//! Every step is staged against committed state, then all stages commit
//! together. Vote moves are elided when the amount is zero or source and
//! destination delegates coincide.

use nbt_governance::{Checkpoint, CheckpointStore, DelegationGraph, PendingCheckpoint};
use nbt_ledger::{BalanceChange, BalanceLedger};
use nbt_types::{AccountId, BlockNumber, Delta, TokenParams};
use std::collections::{HashMap, HashSet};

use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::snapshot::TokenSnapshot;

pub struct TokenController {
    ledger: BalanceLedger,
    delegation: DelegationGraph,
    checkpoints: CheckpointStore,
    /// The open block. Everything below it is finalized.
    block: BlockNumber,
}

impl TokenController {
    pub fn new(params: TokenParams, owner: AccountId) -> Self {
        tracing::info!(
            name = %params.name,
            symbol = %params.symbol,
            cap = params.cap,
            %owner,
            "token ledger created"
        );
        Self {
            ledger: BalanceLedger::new(params, owner),
            delegation: DelegationGraph::new(),
            checkpoints: CheckpointStore::new(),
            block: BlockNumber::GENESIS,
        }
    }

    // ── Metadata ───────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.ledger.params().name
    }

    pub fn symbol(&self) -> &str {
        &self.ledger.params().symbol
    }

    pub fn decimals(&self) -> u8 {
        self.ledger.params().decimals
    }

    pub fn cap(&self) -> u128 {
        self.ledger.cap()
    }

    pub fn params(&self) -> &TokenParams {
        self.ledger.params()
    }

    /// Current owner, or the null account once ownership is renounced.
    pub fn owner(&self) -> AccountId {
        self.ledger.owner().unwrap_or(AccountId::ZERO)
    }

    // ── Balance queries ────────────────────────────────────────────────

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.ledger.balance_of(account)
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.ledger.allowance(owner, spender)
    }

    // ── Vote queries ───────────────────────────────────────────────────

    /// Delegate of `account`, or the null account if it never delegated.
    pub fn delegates(&self, account: &AccountId) -> AccountId {
        self.delegation
            .delegate_of(account)
            .unwrap_or(AccountId::ZERO)
    }

    pub fn delegators(&self, delegate: &AccountId) -> Vec<AccountId> {
        self.delegation.delegators(delegate)
    }

    pub fn get_current_votes(&self, account: &AccountId) -> u128 {
        self.checkpoints.get_votes(account)
    }

    /// Votes of `account` at a finalized block.
    pub fn get_prior_votes(
        &self,
        account: &AccountId,
        block: BlockNumber,
    ) -> Result<u128, TokenError> {
        Ok(self
            .checkpoints
            .get_prior_votes(account, block, self.block)?)
    }

    pub fn num_checkpoints(&self, account: &AccountId) -> usize {
        self.checkpoints.num_checkpoints(account)
    }

    pub fn checkpoints(&self, account: &AccountId) -> &[Checkpoint] {
        self.checkpoints.checkpoints(account)
    }

    // ── Clock ──────────────────────────────────────────────────────────

    pub fn current_block(&self) -> BlockNumber {
        self.block
    }

    /// Finalize the open block and open the next one.
    ///
    /// The block at `u64::MAX` can never be finalized; advancing past it is
    /// rejected and the clock stays put.
    pub fn advance_block(&mut self) -> Result<BlockNumber, TokenError> {
        self.block = self
            .block
            .checked_next()
            .ok_or(TokenError::ClockExhausted { current: self.block })?;
        tracing::trace!(block = self.block.as_u64(), "block advanced");
        Ok(self.block)
    }

    /// Jump the clock forward to `block`. Moving backwards is rejected.
    pub fn set_block(&mut self, block: BlockNumber) -> Result<(), TokenError> {
        if block < self.block {
            return Err(TokenError::BlockRegression {
                requested: block,
                current: self.block,
            });
        }
        self.block = block;
        Ok(())
    }

    // ── Supply ─────────────────────────────────────────────────────────

    /// Owner mints `amount` to itself.
    pub fn mint(&mut self, caller: &AccountId, amount: u128) -> Result<Vec<TokenEvent>, TokenError> {
        self.mint_to(caller, caller, amount)
    }

    /// Owner mints `amount` to `to`.
    pub fn mint_to(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let result = self
            .ledger
            .prepare_mint(caller, to, amount)
            .map_err(TokenError::from)
            .and_then(|change| self.execute(change));
        self.log_outcome("mint", caller, amount, &result);
        result
    }

    /// `caller` burns `amount` of its own balance.
    pub fn burn(&mut self, caller: &AccountId, amount: u128) -> Result<Vec<TokenEvent>, TokenError> {
        let result = self
            .ledger
            .prepare_burn(caller, amount)
            .map_err(TokenError::from)
            .and_then(|change| self.execute(change));
        self.log_outcome("burn", caller, amount, &result);
        result
    }

    // ── Transfers ──────────────────────────────────────────────────────

    pub fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let result = self
            .ledger
            .prepare_transfer(caller, to, amount)
            .map_err(TokenError::from)
            .and_then(|change| self.execute(change));
        self.log_outcome("transfer", caller, amount, &result);
        result
    }

    pub fn approve(
        &mut self,
        caller: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let result = self
            .ledger
            .approve(caller, spender, amount)
            .map(|()| {
                vec![TokenEvent::Approval {
                    owner: *caller,
                    spender: *spender,
                    amount,
                }]
            })
            .map_err(TokenError::from);
        self.log_outcome("approve", caller, amount, &result);
        result
    }

    /// `caller` moves `amount` from `from` to `to` out of its allowance.
    pub fn transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let result = self.spend_and_transfer(caller, from, to, amount);
        self.log_outcome("transfer_from", caller, amount, &result);
        result
    }

    fn spend_and_transfer(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let spend = self.ledger.prepare_spend_allowance(from, spender, amount)?;
        let change = self.ledger.prepare_transfer(from, to, amount)?;
        let pending = self.stage_votes(&change)?;
        self.ledger.apply_allowance(spend);
        Ok(self.commit(change, pending))
    }

    // ── Delegation ─────────────────────────────────────────────────────

    /// Point `caller`'s voting weight at `new_delegate`.
    ///
    /// The whole current balance of `caller` moves from the old delegate's
    /// total to the new one's at the open block. Delegating to the null
    /// account withdraws the weight without assigning it.
    pub fn delegate(
        &mut self,
        caller: &AccountId,
        new_delegate: &AccountId,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let old = self.delegation.delegate_of(caller);
        let new = (!new_delegate.is_zero()).then_some(*new_delegate);
        let weight = self.ledger.balance_of(caller);

        let result = self.prepare_vote_moves(old, new, weight).map(|pending| {
            self.delegation.delegate(caller, new_delegate);
            let mut events = vec![TokenEvent::DelegateChanged {
                delegator: *caller,
                from_delegate: old.unwrap_or(AccountId::ZERO),
                to_delegate: new.unwrap_or(AccountId::ZERO),
            }];
            self.commit_votes(pending, &mut events);
            events
        });
        self.log_outcome("delegate", caller, weight, &result);
        result
    }

    // ── Ownership ──────────────────────────────────────────────────────

    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let result = self
            .ledger
            .transfer_ownership(caller, new_owner)
            .map(|previous_owner| {
                vec![TokenEvent::OwnershipTransferred {
                    previous_owner,
                    new_owner: *new_owner,
                }]
            })
            .map_err(TokenError::from);
        self.log_outcome("transfer_ownership", caller, 0, &result);
        result
    }

    pub fn renounce_ownership(&mut self, caller: &AccountId) -> Result<Vec<TokenEvent>, TokenError> {
        let result = self
            .ledger
            .renounce_ownership(caller)
            .map(|()| {
                vec![TokenEvent::OwnershipTransferred {
                    previous_owner: *caller,
                    new_owner: AccountId::ZERO,
                }]
            })
            .map_err(TokenError::from);
        self.log_outcome("renounce_ownership", caller, 0, &result);
        result
    }

    // ── Staging ────────────────────────────────────────────────────────

    /// Stage the vote moves for `change`, then commit both.
    fn execute(&mut self, change: BalanceChange) -> Result<Vec<TokenEvent>, TokenError> {
        let pending = self.stage_votes(&change)?;
        Ok(self.commit(change, pending))
    }

    fn stage_votes(&self, change: &BalanceChange) -> Result<Vec<PendingCheckpoint>, TokenError> {
        let src = change
            .movement
            .source()
            .and_then(|a| self.delegation.delegate_of(&a));
        let dst = change
            .movement
            .destination()
            .and_then(|a| self.delegation.delegate_of(&a));
        self.prepare_vote_moves(src, dst, change.amount)
    }

    fn prepare_vote_moves(
        &self,
        src: Option<AccountId>,
        dst: Option<AccountId>,
        amount: u128,
    ) -> Result<Vec<PendingCheckpoint>, TokenError> {
        if amount == 0 || src == dst {
            return Ok(Vec::new());
        }
        let mut pending = Vec::with_capacity(2);
        if let Some(src) = src {
            pending.push(
                self.checkpoints
                    .prepare_move(&src, Delta::Decrease(amount), self.block)?,
            );
        }
        if let Some(dst) = dst {
            pending.push(
                self.checkpoints
                    .prepare_move(&dst, Delta::Increase(amount), self.block)?,
            );
        }
        Ok(pending)
    }

    fn commit(&mut self, change: BalanceChange, pending: Vec<PendingCheckpoint>) -> Vec<TokenEvent> {
        let mut events = vec![TokenEvent::Transfer {
            from: change.movement.source().unwrap_or(AccountId::ZERO),
            to: change.movement.destination().unwrap_or(AccountId::ZERO),
            amount: change.amount,
        }];
        self.ledger.apply(change);
        self.commit_votes(pending, &mut events);
        events
    }

    fn commit_votes(&mut self, pending: Vec<PendingCheckpoint>, events: &mut Vec<TokenEvent>) {
        for p in pending {
            let changed = self.checkpoints.commit(p);
            events.push(TokenEvent::DelegateVotesChanged {
                delegate: changed.delegate,
                previous: changed.previous,
                new: changed.new,
            });
        }
    }

    fn log_outcome(
        &self,
        op: &'static str,
        caller: &AccountId,
        amount: u128,
        result: &Result<Vec<TokenEvent>, TokenError>,
    ) {
        match result {
            Ok(events) => tracing::debug!(
                op,
                %caller,
                amount,
                block = self.block.as_u64(),
                events = events.len(),
                "operation committed"
            ),
            Err(e) => tracing::warn!(
                op,
                %caller,
                amount,
                block = self.block.as_u64(),
                error = %e,
                "operation rejected"
            ),
        }
    }

    // ── Consistency ────────────────────────────────────────────────────

    /// Recompute every ledger invariant from scratch.
    ///
    /// - Σ balances == total supply <= cap
    /// - each delegate's latest votes == Σ balances of its delegators
    /// - checkpoint histories strictly increasing, none past the open block
    pub fn check_invariants(&self) -> Result<(), TokenError> {
        let sum = self
            .ledger
            .sum_of_balances()
            .ok_or_else(|| TokenError::InvariantViolation("balance sum overflows".into()))?;
        if sum != self.ledger.total_supply() {
            return Err(TokenError::InvariantViolation(format!(
                "balances sum to {sum}, total supply is {}",
                self.ledger.total_supply()
            )));
        }
        if self.ledger.total_supply() > self.ledger.cap() {
            return Err(TokenError::InvariantViolation(format!(
                "total supply {} exceeds cap {}",
                self.ledger.total_supply(),
                self.ledger.cap()
            )));
        }

        let mut expected: HashMap<AccountId, u128> = HashMap::new();
        for (delegator, delegate) in self.delegation.delegations() {
            let entry = expected.entry(*delegate).or_insert(0);
            *entry = entry
                .checked_add(self.ledger.balance_of(delegator))
                .ok_or_else(|| TokenError::InvariantViolation("delegated sum overflows".into()))?;
        }
        let delegates: HashSet<AccountId> = expected
            .keys()
            .chain(self.checkpoints.delegates())
            .copied()
            .collect();
        for delegate in delegates {
            let want = expected.get(&delegate).copied().unwrap_or(0);
            let have = self.checkpoints.get_votes(&delegate);
            if want != have {
                return Err(TokenError::InvariantViolation(format!(
                    "delegate {delegate} has {have} votes, delegators hold {want}"
                )));
            }
            if let Some(last) = self.checkpoints.latest(&delegate) {
                if last.from_block > self.block {
                    return Err(TokenError::InvariantViolation(format!(
                        "delegate {delegate} has a checkpoint at {} past open block {}",
                        last.from_block, self.block
                    )));
                }
            }
        }
        if !self.checkpoints.is_well_ordered() {
            return Err(TokenError::InvariantViolation(
                "checkpoint history out of order".into(),
            ));
        }
        Ok(())
    }

    // ── Persistence ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot::new(
            self.block,
            self.ledger.clone(),
            self.delegation.clone(),
            self.checkpoints.clone(),
        )
    }

    /// Rebuild a controller from a snapshot, rejecting inconsistent state.
    pub fn restore(snapshot: TokenSnapshot) -> Result<Self, TokenError> {
        let (block, ledger, delegation, checkpoints) = snapshot.into_parts()?;
        let controller = Self {
            ledger,
            delegation,
            checkpoints,
            block,
        };
        controller.check_invariants()?;
        tracing::info!(
            block = block.as_u64(),
            supply = controller.total_supply(),
            "token ledger restored from snapshot"
        );
        Ok(controller)
    }
}

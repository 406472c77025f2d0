//! Capped balance ledger for the NanoByte token.
//!
//! Balances are plain `u128` raw units keyed by [`nbt_types::AccountId`].
//! Every mutation is split into a validating `prepare_*` step that returns a
//! staged change and an infallible `apply` step, so a caller coordinating
//! several subsystems can detect every error before it writes anything.

pub mod allowance;
pub mod balances;
pub mod error;

pub use allowance::{AllowanceChange, Allowances};
pub use balances::{BalanceChange, BalanceLedger, BalanceMove};
pub use error::LedgerError;

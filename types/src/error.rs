//! Errors shared by every crate that touches balances or votes.

use thiserror::Error;

/// Violation detected by the checked arithmetic in [`crate::arith`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("sum exceeds cap of {cap}")]
    CapExceeded { cap: u128 },
}

/// Failure to parse an [`crate::AccountId`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountIdError {
    #[error("expected 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

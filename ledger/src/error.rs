use nbt_types::{AccountId, ArithmeticError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{caller} is not the owner")]
    Unauthorized { caller: AccountId },

    #[error("minting {requested} would exceed cap {cap} (supply {supply})")]
    CapExceeded {
        requested: u128,
        supply: u128,
        cap: u128,
    },

    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("recipient is the null account")]
    InvalidRecipient,

    #[error("spender is the null account")]
    InvalidSpender,

    #[error("new owner is the null account")]
    InvalidOwner,

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

use nbt_types::BlockNumber;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("ledger error: {0}")]
    Ledger(#[from] nbt_ledger::LedgerError),

    #[error("governance error: {0}")]
    Governance(#[from] nbt_governance::GovernanceError),

    #[error("cannot move clock from {current} back to {requested}")]
    BlockRegression {
        requested: BlockNumber,
        current: BlockNumber,
    },

    #[error("block clock exhausted at {current}")]
    ClockExhausted { current: BlockNumber },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}

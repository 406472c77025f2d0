use nbt_types::{ArithmeticError, BlockNumber};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("block {requested} is not yet finalized (current block {current})")]
    FutureIndex {
        requested: BlockNumber,
        current: BlockNumber,
    },

    #[error("checkpoint at {at} precedes latest checkpoint at {last}")]
    TimeRegression { at: BlockNumber, last: BlockNumber },

    #[error("vote arithmetic: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

//! Events emitted by committed operations.

use nbt_types::params::raw_amount;
use nbt_types::AccountId;
use serde::{Deserialize, Serialize};

/// A record of one state change. Mints are transfers from the null account
/// and burns are transfers to it.
///
/// Amounts serialize as decimal strings so JSON consumers never see a
/// number wider than 64 bits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TokenEvent {
    Transfer {
        from: AccountId,
        to: AccountId,
        #[serde(with = "raw_amount")]
        amount: u128,
    },
    Approval {
        owner: AccountId,
        spender: AccountId,
        #[serde(with = "raw_amount")]
        amount: u128,
    },
    DelegateChanged {
        delegator: AccountId,
        from_delegate: AccountId,
        to_delegate: AccountId,
    },
    DelegateVotesChanged {
        delegate: AccountId,
        #[serde(with = "raw_amount")]
        previous: u128,
        #[serde(with = "raw_amount")]
        new: u128,
    },
    OwnershipTransferred {
        previous_owner: AccountId,
        new_owner: AccountId,
    },
}

impl TokenEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::DelegateChanged { .. } => "DelegateChanged",
            Self::DelegateVotesChanged { .. } => "DelegateVotesChanged",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

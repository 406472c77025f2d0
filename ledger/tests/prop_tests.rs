use proptest::prelude::*;

use nbt_ledger::{BalanceLedger, LedgerError};
use nbt_types::{AccountId, TokenParams};

#[derive(Clone, Debug)]
enum Op {
    Mint { to: u8, amount: u128 },
    Burn { from: u8, amount: u128 },
    Transfer { from: u8, to: u8, amount: u128 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u8..5, 0u128..400_000).prop_map(|(to, amount)| Op::Mint { to, amount }),
        (1u8..5, 0u128..200_000).prop_map(|(from, amount)| Op::Burn { from, amount }),
        (1u8..5, 0u8..5, 0u128..200_000)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
    ]
}

const CAP: u128 = 1_000_000;

proptest! {
    /// Σ balances == total supply <= cap after any sequence of operations.
    #[test]
    fn supply_matches_balances_and_respects_cap(ops in prop::collection::vec(op(), 1..60)) {
        let owner = AccountId::repeat_byte(1);
        let mut ledger = BalanceLedger::new(TokenParams::with_cap(CAP), owner);
        for op in ops {
            let _ = match op {
                Op::Mint { to, amount } => {
                    ledger.mint(&owner, &AccountId::repeat_byte(to), amount)
                }
                Op::Burn { from, amount } => ledger.burn(&AccountId::repeat_byte(from), amount),
                Op::Transfer { from, to, amount } => ledger.transfer(
                    &AccountId::repeat_byte(from),
                    &AccountId::repeat_byte(to),
                    amount,
                ),
            };
            prop_assert_eq!(ledger.sum_of_balances(), Some(ledger.total_supply()));
            prop_assert!(ledger.total_supply() <= CAP);
        }
    }

    /// A rejected operation leaves every balance untouched.
    #[test]
    fn failed_transfer_changes_nothing(minted in 0u128..1_000, extra in 1u128..1_000) {
        let owner = AccountId::repeat_byte(1);
        let bob = AccountId::repeat_byte(2);
        let mut ledger = BalanceLedger::new(TokenParams::with_cap(CAP), owner);
        ledger.mint(&owner, &owner, minted).unwrap();
        let err = ledger.transfer(&owner, &bob, minted + extra).unwrap_err();
        let is_insufficient = matches!(err, LedgerError::InsufficientBalance { .. });
        prop_assert!(is_insufficient);
        prop_assert_eq!(ledger.balance_of(&owner), minted);
        prop_assert_eq!(ledger.balance_of(&bob), 0);
    }
}

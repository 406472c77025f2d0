use proptest::prelude::*;

use nbt_token::TokenController;
use nbt_types::{AccountId, BlockNumber, TokenParams};

const CAP: u128 = 1_000_000;

#[derive(Clone, Debug)]
enum Op {
    Mint { to: u8, amount: u128 },
    Burn { from: u8, amount: u128 },
    Transfer { from: u8, to: u8, amount: u128 },
    Delegate { from: u8, to: u8 },
    Approve { owner: u8, spender: u8, amount: u128 },
    TransferFrom { spender: u8, from: u8, to: u8, amount: u128 },
    Advance { blocks: u64 },
}

/// Account 0 is the null account, 1 is the owner.
fn account(i: u8) -> AccountId {
    if i == 0 {
        AccountId::ZERO
    } else {
        AccountId::repeat_byte(i)
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u8..5, 0u128..300_000).prop_map(|(to, amount)| Op::Mint { to, amount }),
        (1u8..5, 0u128..100_000).prop_map(|(from, amount)| Op::Burn { from, amount }),
        (1u8..5, 0u8..5, 0u128..150_000)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (1u8..5, 0u8..5).prop_map(|(from, to)| Op::Delegate { from, to }),
        (1u8..5, 0u8..5, 0u128..150_000)
            .prop_map(|(owner, spender, amount)| Op::Approve { owner, spender, amount }),
        (1u8..5, 1u8..5, 0u8..5, 0u128..150_000).prop_map(|(spender, from, to, amount)| {
            Op::TransferFrom { spender, from, to, amount }
        }),
        (0u64..3).prop_map(|blocks| Op::Advance { blocks }),
    ]
}

fn run(t: &mut TokenController, op: &Op) {
    let owner = account(1);
    let _ = match *op {
        Op::Mint { to, amount } => t.mint_to(&owner, &account(to), amount),
        Op::Burn { from, amount } => t.burn(&account(from), amount),
        Op::Transfer { from, to, amount } => t.transfer(&account(from), &account(to), amount),
        Op::Delegate { from, to } => t.delegate(&account(from), &account(to)),
        Op::Approve { owner, spender, amount } => {
            t.approve(&account(owner), &account(spender), amount)
        }
        Op::TransferFrom { spender, from, to, amount } => {
            t.transfer_from(&account(spender), &account(from), &account(to), amount)
        }
        Op::Advance { blocks } => {
            let target = BlockNumber::new(t.current_block().as_u64() + blocks);
            t.set_block(target).map(|()| Vec::new())
        }
    };
}

proptest! {
    /// Supply, balance and vote invariants hold after every operation.
    #[test]
    fn invariants_hold_after_every_op(ops in prop::collection::vec(op(), 1..80)) {
        let mut t = TokenController::new(TokenParams::with_cap(CAP), account(1));
        for op in &ops {
            run(&mut t, op);
            prop_assert!(t.check_invariants().is_ok(), "after {:?}: {:?}", op, t.check_invariants());
            prop_assert!(t.total_supply() <= CAP);
        }
    }

    /// Prior votes at the last finalized block equal current votes once a
    /// block has passed without changes.
    #[test]
    fn prior_votes_catch_up_after_finalization(ops in prop::collection::vec(op(), 1..40)) {
        let mut t = TokenController::new(TokenParams::with_cap(CAP), account(1));
        for op in &ops {
            run(&mut t, op);
        }
        let sealed = t.current_block();
        t.advance_block().unwrap();
        for i in 1u8..5 {
            let a = account(i);
            prop_assert_eq!(t.get_prior_votes(&a, sealed), Ok(t.get_current_votes(&a)));
            let history = t.checkpoints(&a);
            prop_assert!(history.windows(2).all(|w| w[0].from_block < w[1].from_block));
        }
    }

    /// Snapshots restore to an identical ledger.
    #[test]
    fn snapshot_restore_is_faithful(ops in prop::collection::vec(op(), 1..40)) {
        let mut t = TokenController::new(TokenParams::with_cap(CAP), account(1));
        for op in &ops {
            run(&mut t, op);
        }
        let bytes = t.snapshot().to_bytes().unwrap();
        let restored = TokenController::restore(
            nbt_token::TokenSnapshot::from_bytes(&bytes).unwrap(),
        )
        .unwrap();
        prop_assert_eq!(restored.total_supply(), t.total_supply());
        prop_assert_eq!(restored.current_block(), t.current_block());
        for i in 1u8..5 {
            let a = account(i);
            prop_assert_eq!(restored.balance_of(&a), t.balance_of(&a));
            prop_assert_eq!(restored.delegates(&a), t.delegates(&a));
            prop_assert_eq!(restored.checkpoints(&a), t.checkpoints(&a));
        }
    }
}

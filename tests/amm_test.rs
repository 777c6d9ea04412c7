#![allow(clippy::unwrap_used, clippy::expect_used)]

use amm::{
    Amm, AmmAction, TokenType, BALANCE_UPPER_BOUND, MAX_FUND_AMOUNT, POOL_UPPER_BOUND,
};
use assertables::{assert_err, assert_ok};
use cpamm::{state_store::StateStore, tx_executor::TxExecutor};
use proptest::prelude::*;
use sdk::{AccountId, LedgerContract};

const ALICE: AccountId = AccountId(1);
const BOB: AccountId = AccountId(2);

fn init(reserve_a: u128, reserve_b: u128) -> AmmAction {
    AmmAction::InitializePool {
        reserve_a,
        reserve_b,
    }
}

fn fund(amount_a: u128, amount_b: u128) -> AmmAction {
    AmmAction::FundAccount { amount_a, amount_b }
}

fn swap(token_from: u32, amount_from: u128) -> AmmAction {
    AmmAction::Swap {
        token_from,
        amount_from,
    }
}

fn executor_with_pool(reserve_a: u128, reserve_b: u128) -> TxExecutor<Amm> {
    let mut executor = TxExecutor::new(Amm::default(), 100);
    assert_ok!(executor.execute_tx(AccountId(0), &init(reserve_a, reserve_b)));
    executor
}

#[test_log::test]
fn scenario_two_traders() {
    let mut executor = executor_with_pool(1000, 1000);
    assert_ok!(executor.execute_tx(ALICE, &fund(1000, 1000)));
    assert_ok!(executor.execute_tx(BOB, &fund(0, 300)));

    let output = executor.execute_tx(ALICE, &swap(0, 500)).unwrap();
    assert_eq!(output.output_str(), "Swapped 500 A for 333 B");
    assert!(output.success);
    assert_ne!(output.initial_state, output.next_state);

    // Pool is now 1500 A / 667 B.
    let output = executor.execute_tx(BOB, &swap(1, 300)).unwrap();
    assert_eq!(output.output_str(), "Swapped 300 B for 465 A");

    let amm = executor.contract();
    assert_eq!(amm.get_pool_reserve(TokenType::A), 1035);
    assert_eq!(amm.get_pool_reserve(TokenType::B), 967);
    assert_eq!(amm.get_account_balance(ALICE, TokenType::A), 500);
    assert_eq!(amm.get_account_balance(ALICE, TokenType::B), 1333);
    assert_eq!(amm.get_account_balance(BOB, TokenType::A), 465);
    assert_eq!(amm.get_account_balance(BOB, TokenType::B), 0);
}

#[test_log::test]
fn failed_calls_leave_no_trace() {
    let mut executor = executor_with_pool(1000, 1000);
    assert_ok!(executor.execute_tx(ALICE, &fund(1000, 1000)));
    let before = executor.contract().clone();

    assert_err!(executor.execute_tx(ALICE, &swap(2, 1)));
    assert_err!(executor.execute_tx(ALICE, &swap(0, 1001)));
    assert_err!(executor.execute_tx(ALICE, &swap(0, u128::MAX)));
    assert_err!(executor.execute_tx(ALICE, &fund(MAX_FUND_AMOUNT + 1, 1)));
    assert_err!(executor.execute_tx(ALICE, &init(1, POOL_UPPER_BOUND)));

    assert_eq!(executor.contract(), &before);
    assert_eq!(executor.contract().commit(), before.commit());
}

#[test_log::test]
fn swap_hitting_reserve_ceiling_is_rejected() {
    let mut executor = executor_with_pool(POOL_UPPER_BOUND - 10, 1000);
    assert_ok!(executor.execute_tx(ALICE, &fund(100, 0)));
    let before = executor.contract().clone();

    let err = executor.execute_tx(ALICE, &swap(0, 100)).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
    assert_eq!(executor.contract(), &before);
}

#[test_log::test]
fn cancelled_funding_drops_dependent_swap() {
    let mut executor = executor_with_pool(1000, 1000);
    let funding = executor.execute_tx(ALICE, &fund(100, 0)).unwrap();
    assert_ok!(executor.execute_tx(ALICE, &swap(0, 100)));
    assert_ok!(executor.execute_tx(BOB, &fund(5, 5)));

    assert_ok!(executor.cancel_tx(&funding.tx_hash));

    let amm = executor.contract();
    assert_eq!(amm.get_pool_reserve(TokenType::A), 1000);
    assert_eq!(amm.get_account_balance(ALICE, TokenType::B), 0);
    assert_eq!(amm.get_account_balance(BOB, TokenType::A), 5);
}

#[test]
fn concurrent_callers_are_serialized() {
    let shared = executor_with_pool(100_000, 100_000).shared();

    let handles: Vec<_> = (1..=8)
        .map(|id| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                let account = AccountId(id);
                shared.execute_tx(account, &fund(1000, 0)).unwrap();
                for _ in 0..10 {
                    shared.execute_tx(account, &swap(0, 100)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let (reserve_a, total_a) = shared
        .read(|amm| {
            let total: u128 = amm
                .accounts()
                .filter(|(_, token, _)| *token == TokenType::A)
                .map(|(_, _, balance)| balance)
                .sum();
            (amm.get_pool_reserve(TokenType::A), total)
        })
        .unwrap();
    assert_eq!(reserve_a, 108_000);
    assert_eq!(total_a, 0);
}

#[test]
fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("amm_state.bin"));

    let mut executor = executor_with_pool(1000, 1000);
    assert_ok!(executor.execute_tx(ALICE, &fund(10, 20)));
    store.save(executor.contract()).unwrap();

    let reloaded: Amm = store.load_or_default().unwrap();
    assert_eq!(reloaded.commit(), executor.contract().commit());
    assert_eq!(reloaded.get_account_balance(ALICE, TokenType::B), 20);
}

#[derive(Debug, Clone)]
enum Op {
    Init(u128, u128),
    Fund(u64, u128, u128),
    Swap(u64, u32, u128),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (0..POOL_UPPER_BOUND + 10, 0..POOL_UPPER_BOUND + 10).prop_map(|(a, b)| Op::Init(a, b)),
        3 => (0..4u64, 0..=MAX_FUND_AMOUNT + 1, 0..=MAX_FUND_AMOUNT + 1)
            .prop_map(|(who, a, b)| Op::Fund(who, a, b)),
        6 => (0..4u64, 0..3u32, 0..2 * MAX_FUND_AMOUNT).prop_map(|(who, t, n)| Op::Swap(who, t, n)),
    ]
}

fn run_op(executor: &mut TxExecutor<Amm>, op: &Op) -> anyhow::Result<()> {
    let (who, action) = match *op {
        Op::Init(a, b) => (0, init(a, b)),
        Op::Fund(who, a, b) => (who, fund(a, b)),
        Op::Swap(who, t, n) => (who, swap(t, n)),
    };
    executor.execute_tx(AccountId(who), &action).map(|_| ())
}

proptest! {
    #[test]
    fn stored_values_stay_in_bounds(ops in prop::collection::vec(op(), 1..60)) {
        let mut executor = TxExecutor::new(Amm::default(), 10);
        for op in &ops {
            let _ = run_op(&mut executor, op);
            let amm = executor.contract();
            for token in TokenType::ALL {
                prop_assert!(amm.get_pool_reserve(token) < POOL_UPPER_BOUND);
            }
            for (_, _, balance) in amm.accounts() {
                prop_assert!(balance < BALANCE_UPPER_BOUND);
            }
        }
    }

    #[test]
    fn swap_conserves_tokens_and_never_shrinks_product(
        reserve_a in 0..1_000_000u128,
        reserve_b in 0..1_000_000u128,
        from_b in any::<bool>(),
        amount_from in 0..=MAX_FUND_AMOUNT,
    ) {
        let mut executor = executor_with_pool(reserve_a, reserve_b);
        executor.execute_tx(ALICE, &fund(MAX_FUND_AMOUNT, MAX_FUND_AMOUNT)).unwrap();
        let token_from = if from_b { TokenType::B } else { TokenType::A };
        let token_to = token_from.opposite();

        let before = executor.contract().clone();
        let quoted = before.quote(token_from, amount_from).unwrap();
        let output = executor.execute_tx(ALICE, &swap(token_from.id(), amount_from));
        let after = executor.contract();

        if output.is_err() {
            prop_assert_eq!(after, &before);
            return Ok(());
        }

        for token in TokenType::ALL {
            prop_assert_eq!(
                before.get_pool_reserve(token) + before.get_account_balance(ALICE, token),
                after.get_pool_reserve(token) + after.get_account_balance(ALICE, token)
            );
        }
        prop_assert_eq!(
            after.get_account_balance(ALICE, token_to) - before.get_account_balance(ALICE, token_to),
            quoted
        );
        prop_assert!(
            after.get_pool_reserve(TokenType::A) * after.get_pool_reserve(TokenType::B)
                >= reserve_a * reserve_b
        );
    }

    #[test]
    fn zero_swap_is_a_noop(
        reserve_a in 0..POOL_UPPER_BOUND,
        reserve_b in 0..POOL_UPPER_BOUND,
        token in 0..2u32,
    ) {
        let mut executor = executor_with_pool(reserve_a, reserve_b);
        executor.execute_tx(ALICE, &fund(1, 1)).unwrap();
        let before = executor.contract().clone();
        let output = executor.execute_tx(ALICE, &swap(token, 0)).unwrap();
        prop_assert_eq!(executor.contract(), &before);
        prop_assert_eq!(output.initial_state, output.next_state);
    }
}

//! Batch ordering across every trade shape
//!
//! Run with: cargo test -p batch-core --test batches
//! Increase cases: PROPTEST_CASES=1000 cargo test -p batch-core --test batches

use batch_core::*;
use cfmm_model::{Amount, Direction, SlippageBps};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

const CFMM: &str = "KT1H5b7LxEExkFd2Tng77TfuWbM5aPvHstPr";
const CASH: &str = "KT1SjXiUX63QvdNMcM2m492f7kuf8JxXRLp4";
const TOKEN: &str = "KT1AEfeckNbdEYwaMKkytBwPJPycz7jdSGea";
const LQT: &str = "KT1AafHA1C1vk959wvHWBispY9Y2f3fxBUUo";
const ALICE: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";
const BOB: &str = "tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6";

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

fn handles() -> ContractHandles {
    ContractHandles::new(addr(CFMM), addr(CASH), addr(TOKEN), addr(LQT), 0)
}

fn assembler() -> BatchAssembler {
    BatchAssembler::new(handles())
}

fn deadline() -> Deadline {
    Deadline::at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 20, 0).unwrap())
}

fn swap(direction: Direction, input: u64, min_output: u64) -> TradeShape {
    let intent = TradeIntent::new(
        direction,
        Amount::from_raw(input),
        SlippageBps::DEFAULT,
        deadline(),
        addr(BOB),
    )
    .unwrap();
    TradeShape::swap(SwapOrder {
        owner: addr(ALICE),
        intent,
        min_output: Amount::from_raw(min_output),
    })
}

fn cash_allowance(current: i128) -> AllowanceState {
    AllowanceState::new().with_cash(AllowanceSnapshot::new(
        addr(CASH),
        addr(ALICE),
        addr(CFMM),
        current,
    ))
}

fn lqt_allowance(current: i128) -> AllowanceState {
    AllowanceState::new().with_lqt(AllowanceSnapshot::new(
        addr(LQT),
        addr(ALICE),
        addr(CFMM),
        current,
    ))
}

fn approve(contract: &str, amount: u64) -> OperationDescriptor {
    OperationDescriptor::set_allowance(&addr(contract), &addr(CFMM), amount)
}

fn operator(action: OperatorAction) -> OperationDescriptor {
    OperationDescriptor::SetOperator {
        contract: addr(TOKEN),
        owner: addr(ALICE),
        operator: addr(CFMM),
        token_id: 0,
        action,
    }
}

fn cash_to_token_call(input: u64, min_output: u64) -> OperationDescriptor {
    OperationDescriptor::swap(
        &addr(CFMM),
        SwapArgs::CashToToken {
            to: addr(BOB),
            min_tokens_bought: min_output,
            cash_sold: input,
            deadline: deadline(),
        },
    )
}

// ============================================================================
// CASH TO TOKEN
// ============================================================================

#[test]
fn cash_to_token_with_no_allowance() {
    let batch = assembler()
        .assemble(&swap(Direction::CashToToken, 100, 95), &cash_allowance(0))
        .unwrap();

    assert_eq!(
        batch.operations(),
        &[approve(CASH, 100), cash_to_token_call(100, 95), approve(CASH, 0)]
    );
}

#[test]
fn cash_to_token_with_short_allowance_resets_first() {
    let batch = assembler()
        .assemble(&swap(Direction::CashToToken, 100, 95), &cash_allowance(50))
        .unwrap();

    assert_eq!(
        batch.operations(),
        &[
            approve(CASH, 0),
            approve(CASH, 100),
            cash_to_token_call(100, 95),
            approve(CASH, 0),
        ]
    );
}

#[test]
fn cash_to_token_with_sufficient_allowance_still_revokes() {
    let batch = assembler()
        .assemble(&swap(Direction::CashToToken, 100, 95), &cash_allowance(150))
        .unwrap();

    assert_eq!(batch.operations(), &[cash_to_token_call(100, 95), approve(CASH, 0)]);
}

#[test]
fn cash_to_token_negative_allowance_is_rejected() {
    let err = assembler()
        .assemble(&swap(Direction::CashToToken, 100, 95), &cash_allowance(-1))
        .unwrap_err();

    assert!(err.is_integrity_violation());
    assert!(matches!(err, BatchError::InvalidAllowanceState { value: -1, .. }));
}

#[test]
fn cash_to_token_snapshot_for_other_spender_is_rejected() {
    let state = AllowanceState::new().with_cash(AllowanceSnapshot::new(
        addr(CASH),
        addr(ALICE),
        addr(BOB),
        500,
    ));
    let err = assembler()
        .assemble(&swap(Direction::CashToToken, 100, 95), &state)
        .unwrap_err();

    assert_eq!(
        err,
        BatchError::SnapshotMismatch {
            field: "spender",
            expected: addr(CFMM),
            found: addr(BOB),
        }
    );
}

// ============================================================================
// TOKEN TO CASH
// ============================================================================

#[test]
fn token_to_cash_always_brackets() {
    let expected_call = OperationDescriptor::swap(
        &addr(CFMM),
        SwapArgs::TokenToCash {
            to: addr(BOB),
            tokens_sold: 100,
            min_cash_bought: 95,
            deadline: deadline(),
        },
    );

    // Operator state is informational; the bracket is emitted either way
    for state in [
        AllowanceState::new(),
        AllowanceState::new().with_token_operator(true),
        AllowanceState::new().with_token_operator(false),
    ] {
        let batch = assembler()
            .assemble(&swap(Direction::TokenToCash, 100, 95), &state)
            .unwrap();

        assert_eq!(
            batch.operations(),
            &[
                operator(OperatorAction::Add),
                expected_call.clone(),
                operator(OperatorAction::Remove),
            ]
        );
    }
}

#[test]
fn token_to_cash_ignores_cash_snapshot() {
    let batch = assembler()
        .assemble(&swap(Direction::TokenToCash, 100, 95), &cash_allowance(-7))
        .unwrap();

    assert_eq!(batch.len(), 3);
    assert!(batch.operations()[2].is_revocation());
}

// ============================================================================
// LIQUIDITY
// ============================================================================

fn add_liquidity() -> TradeShape {
    TradeShape::AddLiquidity(AddLiquidityIntent {
        owner: addr(ALICE),
        min_lqt_minted: 10,
        max_tokens_deposited: Amount::from_raw(2_000),
        cash_deposited: Amount::from_raw(1_000),
        deadline: deadline(),
    })
}

fn remove_liquidity() -> TradeShape {
    TradeShape::RemoveLiquidity(RemoveLiquidityIntent {
        owner: addr(ALICE),
        to: addr(BOB),
        lqt_burned: 40,
        min_cash_withdrawn: Amount::from_raw(900),
        min_tokens_withdrawn: Amount::from_raw(1_800),
        deadline: deadline(),
    })
}

#[test]
fn add_liquidity_reconciles_cash_then_brackets_call() {
    let batch = assembler().assemble(&add_liquidity(), &cash_allowance(200)).unwrap();

    let add_call = OperationDescriptor::liquidity(
        &addr(CFMM),
        LiquidityArgs::Add {
            owner: addr(ALICE),
            min_lqt_minted: 10,
            max_tokens_deposited: 2_000,
            cash_deposited: 1_000,
            deadline: deadline(),
        },
    );
    assert_eq!(
        batch.operations(),
        &[
            approve(CASH, 0),
            approve(CASH, 1_000),
            operator(OperatorAction::Add),
            add_call,
            operator(OperatorAction::Remove),
        ]
    );
}

#[test]
fn add_liquidity_with_sufficient_allowance_only_brackets() {
    let batch = assembler().assemble(&add_liquidity(), &cash_allowance(1_000)).unwrap();
    let entrypoints: Vec<_> = batch.iter().map(OperationDescriptor::entrypoint).collect();

    assert_eq!(
        entrypoints,
        [
            Entrypoint::UpdateOperators,
            Entrypoint::AddLiquidity,
            Entrypoint::UpdateOperators
        ]
    );
}

#[test]
fn remove_liquidity_reconciles_lqt_and_revokes() {
    let batch = assembler().assemble(&remove_liquidity(), &lqt_allowance(0)).unwrap();

    let remove_call = OperationDescriptor::liquidity(
        &addr(CFMM),
        LiquidityArgs::Remove {
            to: addr(BOB),
            lqt_burned: 40,
            min_cash_withdrawn: 900,
            min_tokens_withdrawn: 1_800,
            deadline: deadline(),
        },
    );
    assert_eq!(
        batch.operations(),
        &[approve(LQT, 40), remove_call, approve(LQT, 0)]
    );
}

#[test]
fn remove_liquidity_needs_lqt_snapshot() {
    let err = assembler().assemble(&remove_liquidity(), &cash_allowance(1_000)).unwrap_err();
    assert_eq!(err, BatchError::MissingAllowance { asset: ContractRole::Lqt });
}

// ============================================================================
// HANDLES
// ============================================================================

#[test]
fn storage_without_lqt_address_is_uninitialized() {
    let storage = CfmmStorage {
        cash_pool: Amount::from_raw(1),
        token_pool: Amount::from_raw(1),
        lqt_total: 1,
        cash_address: Some(addr(CASH)),
        token_address: Some(addr(TOKEN)),
        lqt_address: None,
    };

    let err = ContractHandles::from_storage(Some(addr(CFMM)), &storage, 0).unwrap_err();
    assert_eq!(err, BatchError::UninitializedContract { role: ContractRole::Lqt });
    assert!(!err.is_integrity_violation());
}

#[test]
fn missing_cfmm_address_is_uninitialized() {
    let storage = CfmmStorage {
        cash_pool: Amount::from_raw(1),
        token_pool: Amount::from_raw(1),
        lqt_total: 1,
        cash_address: Some(addr(CASH)),
        token_address: Some(addr(TOKEN)),
        lqt_address: Some(addr(LQT)),
    };

    let err = ContractHandles::from_storage(None, &storage, 0).unwrap_err();
    assert_eq!(err, BatchError::UninitializedContract { role: ContractRole::Cfmm });
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn reconcile_grants_exactly_the_requirement(
        current in 0u64..1_000_000,
        required in 0u64..1_000_000,
    ) {
        let ops = reconcile(&addr(CASH), &addr(CFMM), current, required);

        if current >= required {
            prop_assert!(ops.is_empty());
        } else {
            // Last approval always sets exactly `required`
            prop_assert_eq!(ops.last(), Some(&approve(CASH, required)));
            if current > 0 {
                prop_assert_eq!(ops.len(), 2);
                prop_assert_eq!(&ops[0], &approve(CASH, 0));
            } else {
                prop_assert_eq!(ops.len(), 1);
            }
        }
    }

    #[test]
    fn cash_to_token_never_leaves_standing_allowance(
        current in 0i128..10_000,
        input in 1u64..10_000,
    ) {
        let batch = assembler()
            .assemble(&swap(Direction::CashToToken, input, 1), &cash_allowance(current))
            .unwrap();

        let ops = batch.operations();
        prop_assert_eq!(ops.last(), Some(&approve(CASH, 0)));
        prop_assert_eq!(ops[ops.len() - 2].entrypoint(), Entrypoint::CashToToken);
        // At most one non-zero approval per batch
        let grants = ops
            .iter()
            .filter(|op| {
                matches!(op, OperationDescriptor::SetAllowance { amount, .. } if *amount > 0)
            })
            .count();
        prop_assert!(grants <= 1);
    }

    #[test]
    fn operator_bracket_is_balanced(input in 1u64..u64::MAX / 2) {
        let batch = assembler()
            .assemble(&swap(Direction::TokenToCash, input, 0), &AllowanceState::new())
            .unwrap();

        let adds = batch
            .iter()
            .filter(|op| {
                matches!(op, OperationDescriptor::SetOperator { action: OperatorAction::Add, .. })
            })
            .count();
        let removes = batch.iter().filter(|op| op.is_revocation()).count();
        prop_assert_eq!(adds, 1);
        prop_assert_eq!(removes, 1);
    }
}

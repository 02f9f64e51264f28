//! Quote-then-assemble, end to end

use batch_core::*;
use cfmm_model::{
    estimate, Amount, Direction, FeeSchedule, NewtonSolver, PoolState, SlippageBps, SCALE,
};
use chrono::{TimeZone, Utc};

const CFMM: &str = "KT1H5b7LxEExkFd2Tng77TfuWbM5aPvHstPr";
const CASH: &str = "KT1SjXiUX63QvdNMcM2m492f7kuf8JxXRLp4";
const TOKEN: &str = "KT1AEfeckNbdEYwaMKkytBwPJPycz7jdSGea";
const LQT: &str = "KT1AafHA1C1vk959wvHWBispY9Y2f3fxBUUo";
const ALICE: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

fn planner() -> SwapPlanner {
    SwapPlanner::new(BatchAssembler::new(ContractHandles::new(
        addr(CFMM),
        addr(CASH),
        addr(TOKEN),
        addr(LQT),
        0,
    )))
}

fn pool() -> PoolState {
    PoolState::new(
        Amount::from_units(1_500).unwrap(),
        Amount::from_units(500).unwrap(),
        1_000,
    )
}

fn intent(direction: Direction, units: u64, slippage: u32) -> TradeIntent {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    TradeIntent::new(
        direction,
        Amount::from_units(units).unwrap(),
        SlippageBps::new(slippage).unwrap(),
        Deadline::minutes_from(now, 20).unwrap(),
        addr(ALICE),
    )
    .unwrap()
}

fn cash_allowance(current: i128) -> AllowanceState {
    AllowanceState::new().with_cash(AllowanceSnapshot::new(
        addr(CASH),
        addr(ALICE),
        addr(CFMM),
        current,
    ))
}

#[test]
fn plan_guard_matches_standalone_quote() {
    let trade = intent(Direction::CashToToken, 10, 20);
    let expected = estimate(
        &pool(),
        trade.direction(),
        trade.input_amount(),
        FeeSchedule::HISTORICAL,
        trade.slippage(),
    )
    .unwrap();

    let plan = planner().plan(&pool(), &addr(ALICE), trade, &cash_allowance(0)).unwrap();

    assert_eq!(plan.quote, expected);
    match &plan.batch.operations()[1] {
        OperationDescriptor::InvokeSwap {
            args: SwapArgs::CashToToken { min_tokens_bought, cash_sold, .. },
            ..
        } => {
            assert_eq!(*min_tokens_bought, expected.minimum_output.raw());
            assert_eq!(*cash_sold, 10 * SCALE);
        }
        other => panic!("expected cashToToken, got {:?}", other),
    }
}

#[test]
fn plan_token_to_cash_is_bracketed() {
    let plan = planner()
        .plan(&pool(), &addr(ALICE), intent(Direction::TokenToCash, 5, 50), &AllowanceState::new())
        .unwrap();

    let entrypoints: Vec<_> = plan.batch.iter().map(|op| op.entrypoint().as_str()).collect();
    assert_eq!(entrypoints, ["update_operators", "tokenToCash", "update_operators"]);
    assert!(plan.quote.minimum_output.raw() > 0);
}

#[test]
fn plan_deadline_serializes_in_ledger_format() {
    let plan = planner()
        .plan(
            &pool(),
            &addr(ALICE),
            intent(Direction::CashToToken, 1, 20),
            &cash_allowance(SCALE as i128),
        )
        .unwrap();

    let params = plan.batch.transfer_params();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].entrypoint, Entrypoint::CashToToken);
    assert_eq!(params[0].args[3], serde_json::json!("2024-03-01T12:20:00.000Z"));
    assert_eq!(params[1].args, vec![serde_json::json!(CFMM), serde_json::json!(0)]);
}

#[test]
fn plan_surfaces_quote_errors() {
    let empty = PoolState::new(Amount::ZERO, Amount::from_units(500).unwrap(), 0);
    let err = planner()
        .plan(&empty, &addr(ALICE), intent(Direction::CashToToken, 1, 20), &cash_allowance(0))
        .unwrap_err();

    assert!(matches!(err, BatchError::Quote(_)));
}

#[test]
fn custom_fee_and_solver_flow_through() {
    let trade = intent(Direction::CashToToken, 10, 0);
    let default_quote = planner().quote(&pool(), &trade).unwrap();

    let cheaper = planner()
        .with_fee(FeeSchedule::new(1, 1).unwrap())
        .with_solver(NewtonSolver::with_tolerance(50, 1e-9));
    let no_fee_quote = cheaper.quote(&pool(), &trade).unwrap();

    assert!(no_fee_quote.expected_output > default_quote.expected_output);
    assert!(no_fee_quote.minimum_output >= default_quote.minimum_output);
}

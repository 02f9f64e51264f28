//! Batch assembly per trade shape
//!
//! Authoritative operation order:
//! - addLiquidity:    [cash reconcile] [operator add] addLiquidity [operator remove]
//! - removeLiquidity: [lqt reconcile] removeLiquidity approve(lqt, 0)
//! - cashToToken:     [cash reconcile] cashToToken approve(cash, 0)
//! - tokenToCash:     [operator add] tokenToCash [operator remove]
//!
//! The trailing `approve(.., 0)` is unconditional: it clears whatever allowance
//! is left, including one that predates this batch.

use log::info;
use serde::Serialize;

use crate::allowance::reconcile;
use crate::operator::bracket;
use crate::{
    AddLiquidityIntent, Address, AllowanceSnapshot, AllowanceState, BatchError, ContractHandles,
    ContractRole, LiquidityArgs, OperationDescriptor, RemoveLiquidityIntent, Result, SwapArgs,
    SwapOrder, TradeShape, TransferParams,
};
use cfmm_model::Direction;

/// Ordered operations to submit as one atomic batch.
///
/// Owned by the caller; discarding it cancels the trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Batch(Vec<OperationDescriptor>);

impl Batch {
    pub fn operations(&self) -> &[OperationDescriptor] {
        &self.0
    }

    pub fn into_operations(self) -> Vec<OperationDescriptor> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, OperationDescriptor> {
        self.0.iter()
    }

    /// Every operation as a contract call, in batch order
    pub fn transfer_params(&self) -> Vec<TransferParams> {
        self.0.iter().map(OperationDescriptor::transfer_params).collect()
    }
}

impl IntoIterator for Batch {
    type Item = OperationDescriptor;
    type IntoIter = std::vec::IntoIter<OperationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a OperationDescriptor;
    type IntoIter = core::slice::Iter<'a, OperationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds batches against one set of contract handles
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    handles: ContractHandles,
}

impl BatchAssembler {
    pub fn new(handles: ContractHandles) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &ContractHandles {
        &self.handles
    }

    /// Assemble the batch for `shape` given the approvals fetched for it.
    ///
    /// # Errors
    /// * `MissingAllowance` if the shape needs a snapshot that isn't in `allowances`
    /// * `SnapshotMismatch` if a snapshot was taken for another contract, owner or spender
    /// * `InvalidAllowanceState` if a snapshot is negative
    /// * `DirectionMismatch` if a swap order sits in the wrong shape
    pub fn assemble(&self, shape: &TradeShape, allowances: &AllowanceState) -> Result<Batch> {
        let operations = match shape {
            TradeShape::AddLiquidity(intent) => self.add_liquidity(intent, allowances)?,
            TradeShape::RemoveLiquidity(intent) => self.remove_liquidity(intent, allowances)?,
            TradeShape::CashToToken(order) => self.cash_to_token(order, allowances)?,
            TradeShape::TokenToCash(order) => self.token_to_cash(order)?,
        };

        info!("assembled {} batch: {} operations", shape.name(), operations.len());
        Ok(Batch(operations))
    }

    fn add_liquidity(
        &self,
        intent: &AddLiquidityIntent,
        allowances: &AllowanceState,
    ) -> Result<Vec<OperationDescriptor>> {
        let h = &self.handles;
        let current =
            self.current_allowance(ContractRole::Cash, &intent.owner, allowances.cash.as_ref())?;

        let mut ops = reconcile(h.cash(), h.cfmm(), current, intent.cash_deposited.raw());
        let call = OperationDescriptor::liquidity(
            h.cfmm(),
            LiquidityArgs::Add {
                owner: intent.owner.clone(),
                min_lqt_minted: intent.min_lqt_minted,
                max_tokens_deposited: intent.max_tokens_deposited.raw(),
                cash_deposited: intent.cash_deposited.raw(),
                deadline: intent.deadline,
            },
        );
        ops.extend(bracket(h, &intent.owner, call));
        Ok(ops)
    }

    fn remove_liquidity(
        &self,
        intent: &RemoveLiquidityIntent,
        allowances: &AllowanceState,
    ) -> Result<Vec<OperationDescriptor>> {
        let h = &self.handles;
        let current =
            self.current_allowance(ContractRole::Lqt, &intent.owner, allowances.lqt.as_ref())?;

        let mut ops = reconcile(h.lqt(), h.cfmm(), current, intent.lqt_burned);
        ops.push(OperationDescriptor::liquidity(
            h.cfmm(),
            LiquidityArgs::Remove {
                to: intent.to.clone(),
                lqt_burned: intent.lqt_burned,
                min_cash_withdrawn: intent.min_cash_withdrawn.raw(),
                min_tokens_withdrawn: intent.min_tokens_withdrawn.raw(),
                deadline: intent.deadline,
            },
        ));
        ops.push(OperationDescriptor::set_allowance(h.lqt(), h.cfmm(), 0));
        Ok(ops)
    }

    fn cash_to_token(
        &self,
        order: &SwapOrder,
        allowances: &AllowanceState,
    ) -> Result<Vec<OperationDescriptor>> {
        expect_direction(order, Direction::CashToToken, "cashToToken")?;
        let h = &self.handles;
        let intent = &order.intent;
        let current =
            self.current_allowance(ContractRole::Cash, &order.owner, allowances.cash.as_ref())?;

        let mut ops = reconcile(h.cash(), h.cfmm(), current, intent.input_amount().raw());
        ops.push(OperationDescriptor::swap(
            h.cfmm(),
            SwapArgs::CashToToken {
                to: intent.recipient().clone(),
                min_tokens_bought: order.min_output.raw(),
                cash_sold: intent.input_amount().raw(),
                deadline: intent.deadline(),
            },
        ));
        ops.push(OperationDescriptor::set_allowance(h.cash(), h.cfmm(), 0));
        Ok(ops)
    }

    fn token_to_cash(&self, order: &SwapOrder) -> Result<Vec<OperationDescriptor>> {
        expect_direction(order, Direction::TokenToCash, "tokenToCash")?;
        let h = &self.handles;
        let intent = &order.intent;

        let call = OperationDescriptor::swap(
            h.cfmm(),
            SwapArgs::TokenToCash {
                to: intent.recipient().clone(),
                tokens_sold: intent.input_amount().raw(),
                min_cash_bought: order.min_output.raw(),
                deadline: intent.deadline(),
            },
        );
        Ok(bracket(h, &order.owner, call).into())
    }

    /// Validate a snapshot against this batch and return its allowance.
    fn current_allowance(
        &self,
        role: ContractRole,
        owner: &Address,
        snapshot: Option<&AllowanceSnapshot>,
    ) -> Result<u64> {
        let snapshot = snapshot.ok_or(BatchError::MissingAllowance { asset: role })?;

        check_field("contract", self.handles.address(role), &snapshot.contract)?;
        check_field("owner", owner, &snapshot.owner)?;
        check_field("spender", self.handles.cfmm(), &snapshot.spender)?;

        snapshot.validated()
    }
}

fn expect_direction(order: &SwapOrder, expected: Direction, shape: &'static str) -> Result<()> {
    if order.intent.direction() != expected {
        return Err(BatchError::DirectionMismatch {
            shape,
            direction: order.intent.direction(),
        });
    }
    Ok(())
}

fn check_field(field: &'static str, expected: &Address, found: &Address) -> Result<()> {
    if expected != found {
        return Err(BatchError::SnapshotMismatch {
            field,
            expected: expected.clone(),
            found: found.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Deadline, TradeIntent};
    use cfmm_model::{Amount, SlippageBps};
    use chrono::{TimeZone, Utc};

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn assembler() -> BatchAssembler {
        BatchAssembler::new(ContractHandles::new(
            addr("KT1H5b7LxEExkFd2Tng77TfuWbM5aPvHstPr"),
            addr("KT1SjXiUX63QvdNMcM2m492f7kuf8JxXRLp4"),
            addr("KT1AEfeckNbdEYwaMKkytBwPJPycz7jdSGea"),
            addr("KT1AafHA1C1vk959wvHWBispY9Y2f3fxBUUo"),
            0,
        ))
    }

    fn alice() -> Address {
        addr("tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb")
    }

    fn order(direction: Direction) -> SwapOrder {
        SwapOrder {
            owner: alice(),
            intent: TradeIntent::new(
                direction,
                Amount::from_raw(100),
                SlippageBps::DEFAULT,
                Deadline::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 20, 0).unwrap()),
                alice(),
            )
            .unwrap(),
            min_output: Amount::from_raw(95),
        }
    }

    #[test]
    fn test_direction_mismatch() {
        let shape = TradeShape::CashToToken(order(Direction::TokenToCash));
        let err = assembler().assemble(&shape, &AllowanceState::new()).unwrap_err();
        assert!(matches!(err, BatchError::DirectionMismatch { shape: "cashToToken", .. }));
    }

    #[test]
    fn test_missing_cash_snapshot() {
        let shape = TradeShape::swap(order(Direction::CashToToken));
        let err = assembler().assemble(&shape, &AllowanceState::new()).unwrap_err();
        assert_eq!(err, BatchError::MissingAllowance { asset: ContractRole::Cash });
    }

    #[test]
    fn test_snapshot_for_wrong_contract() {
        let a = assembler();
        // LQT snapshot handed in as the cash allowance
        let snapshot = AllowanceSnapshot::new(
            a.handles().lqt().clone(),
            alice(),
            a.handles().cfmm().clone(),
            0,
        );
        let shape = TradeShape::swap(order(Direction::CashToToken));

        let err = a.assemble(&shape, &AllowanceState::new().with_cash(snapshot)).unwrap_err();
        assert!(matches!(err, BatchError::SnapshotMismatch { field: "contract", .. }));
    }

    #[test]
    fn test_snapshot_for_wrong_owner() {
        let a = assembler();
        let bob = addr("tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6");
        let snapshot =
            AllowanceSnapshot::new(a.handles().cash().clone(), bob, a.handles().cfmm().clone(), 0);
        let shape = TradeShape::swap(order(Direction::CashToToken));

        let err = a.assemble(&shape, &AllowanceState::new().with_cash(snapshot)).unwrap_err();
        assert!(matches!(err, BatchError::SnapshotMismatch { field: "owner", .. }));
    }

    #[test]
    fn test_batch_iterates_in_order() {
        let shape = TradeShape::swap(order(Direction::TokenToCash));
        let batch = assembler().assemble(&shape, &AllowanceState::new()).unwrap();

        let entrypoints: Vec<_> = batch.iter().map(|op| op.entrypoint().as_str()).collect();
        assert_eq!(entrypoints, ["update_operators", "tokenToCash", "update_operators"]);
        assert_eq!(batch.transfer_params().len(), 3);
    }
}

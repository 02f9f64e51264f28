//! Quote-then-assemble for swaps
//!
//! reserves → newton → fee → slippage → floor → batch

use cfmm_model::{estimate_with, FeeSchedule, NewtonSolver, PoolState, QuoteBreakdown};
use log::info;

use crate::{
    Address, AllowanceState, Batch, BatchAssembler, Result, SwapOrder, TradeIntent, TradeShape,
};

/// A priced swap ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct SwapPlan {
    pub quote: QuoteBreakdown,
    pub batch: Batch,
}

/// Prices swaps and assembles their batches
#[derive(Debug, Clone)]
pub struct SwapPlanner {
    assembler: BatchAssembler,
    solver: NewtonSolver,
    fee: FeeSchedule,
}

impl SwapPlanner {
    pub fn new(assembler: BatchAssembler) -> Self {
        Self {
            assembler,
            solver: NewtonSolver::default(),
            fee: FeeSchedule::default(),
        }
    }

    pub fn with_fee(mut self, fee: FeeSchedule) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_solver(mut self, solver: NewtonSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn assembler(&self) -> &BatchAssembler {
        &self.assembler
    }

    pub fn quote(&self, pool: &PoolState, intent: &TradeIntent) -> Result<QuoteBreakdown> {
        let quote = estimate_with(
            &self.solver,
            pool,
            intent.direction(),
            intent.input_amount(),
            self.fee,
            intent.slippage(),
        )?;
        Ok(quote)
    }

    /// Price `intent` against `pool` and assemble the batch for `owner`.
    ///
    /// `pool` and `allowances` must have been fetched just before; the batch
    /// is only as fresh as they are.
    pub fn plan(
        &self,
        pool: &PoolState,
        owner: &Address,
        intent: TradeIntent,
        allowances: &AllowanceState,
    ) -> Result<SwapPlan> {
        let quote = self.quote(pool, &intent)?;
        let order = SwapOrder {
            owner: owner.clone(),
            intent,
            min_output: quote.minimum_output,
        };
        let batch = self.assembler.assemble(&TradeShape::swap(order), allowances)?;

        info!(
            "planned {:?}: in={} min_out={} ops={}",
            quote.direction,
            quote.input,
            quote.minimum_output,
            batch.len()
        );
        Ok(SwapPlan { quote, batch })
    }
}

//! Quote pipeline: reserves → raw output → fee → slippage guard
//!
//! - raw      = newton(input pool, output pool, input)
//! - expected = raw · fee
//! - minimum  = ⌊expected · (1 - slippage)⌋
//!
//! `minimum` is what goes on-chain as the trade-failure guard.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Amount, CfmmError, FeeSchedule, NewtonSolver, Result, SlippageBps};

/// Which asset is sold into the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Sell cash (FA1.2), buy token (FA2)
    CashToToken,
    /// Sell token (FA2), buy cash (FA1.2)
    TokenToCash,
}

impl Direction {
    pub const fn opposite(&self) -> Self {
        match self {
            Direction::CashToToken => Direction::TokenToCash,
            Direction::TokenToCash => Direction::CashToToken,
        }
    }
}

/// Snapshot of pool storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    /// Cash reserve (ledger units)
    pub cash_pool: Amount,
    /// Token reserve (ledger units)
    pub token_pool: Amount,
    /// Liquidity tokens issued (unscaled)
    pub lqt_total: u64,
}

impl PoolState {
    pub const fn new(cash_pool: Amount, token_pool: Amount, lqt_total: u64) -> Self {
        Self {
            cash_pool,
            token_pool,
            lqt_total,
        }
    }

    /// A pool with an empty side can't be priced.
    pub fn validate(&self) -> Result<()> {
        if self.cash_pool.is_zero() || self.token_pool.is_zero() {
            return Err(CfmmError::InvalidReserves);
        }
        Ok(())
    }

    /// `(input pool, output pool)` for a trade direction
    pub const fn reserves(&self, direction: Direction) -> (Amount, Amount) {
        match direction {
            Direction::CashToToken => (self.cash_pool, self.token_pool),
            Direction::TokenToCash => (self.token_pool, self.cash_pool),
        }
    }
}

/// Quote for a trade, in ledger units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub direction: Direction,
    pub input: Amount,
    /// Solver output before fee
    pub raw_output: f64,
    /// Output after fee, before slippage
    pub expected_output: f64,
    /// Floor of the slippage-adjusted output; the on-chain guard
    pub minimum_output: Amount,
}

impl QuoteBreakdown {
    /// `expected_output` floored, for display
    pub fn expected_amount(&self) -> Result<Amount> {
        Amount::from_raw_floor(self.expected_output)
    }
}

/// Estimated output for `input` with the default solver (5 Newton steps).
pub fn quote(pool: &PoolState, direction: Direction, input: Amount) -> Result<f64> {
    quote_with(&NewtonSolver::default(), pool, direction, input)
}

/// Estimated output for `input`, before fee and slippage.
///
/// # Errors
/// * `InvalidReserves` if either pool is empty
/// * `InvalidAmount` if `input` is zero
/// * `InsufficientLiquidity` if the output would drain the output pool
pub fn quote_with(
    solver: &NewtonSolver,
    pool: &PoolState,
    direction: Direction,
    input: Amount,
) -> Result<f64> {
    pool.validate()?;
    if input.is_zero() {
        return Err(CfmmError::InvalidAmount("input amount must be positive"));
    }

    let (in_pool, out_pool) = pool.reserves(direction);
    let output = solver.solve(in_pool.as_f64(), out_pool.as_f64(), input.as_f64());

    if !output.is_finite() || output >= out_pool.as_f64() {
        return Err(CfmmError::InsufficientLiquidity);
    }

    debug!(
        "quote {:?}: in={} pools=({}, {}) out={}",
        direction,
        input.raw(),
        in_pool.raw(),
        out_pool.raw(),
        output
    );
    Ok(output)
}

/// Full quote with the default solver.
pub fn estimate(
    pool: &PoolState,
    direction: Direction,
    input: Amount,
    fee: FeeSchedule,
    slippage: SlippageBps,
) -> Result<QuoteBreakdown> {
    estimate_with(&NewtonSolver::default(), pool, direction, input, fee, slippage)
}

/// Full quote: fee first, then slippage, then floor.
pub fn estimate_with(
    solver: &NewtonSolver,
    pool: &PoolState,
    direction: Direction,
    input: Amount,
    fee: FeeSchedule,
    slippage: SlippageBps,
) -> Result<QuoteBreakdown> {
    let raw_output = quote_with(solver, pool, direction, input)?;
    let expected_output = fee.apply(raw_output);
    let minimum_output = Amount::from_raw_floor(slippage.apply(expected_output))?;

    Ok(QuoteBreakdown {
        direction,
        input,
        raw_output,
        expected_output,
        minimum_output,
    })
}

//! CFMM Model - Pricing math for the 8th-power utility curve
//!
//! This crate holds the pure half of the client: curve evaluation, the
//! fixed-step Newton solver, and the quote pipeline that turns a raw solver
//! output into the fee-adjusted expectation and the on-chain minimum-output
//! guard.
//!
//! Everything here is synchronous and free of I/O. Reserves and amounts are
//! integers on the ledger at `SCALE` (1e6); the solver itself works in `f64`
//! because the 8th powers overflow any integer type long before the reserves
//! become unrealistic.

pub mod amount;
pub mod curve;
pub mod fee;
pub mod newton;
pub mod quote;
pub mod stats;

pub use amount::Amount;
pub use curve::{evaluate, CurvePoint};
pub use fee::{FeeSchedule, SlippageBps};
pub use newton::NewtonSolver;
pub use quote::{estimate, estimate_with, quote, quote_with, Direction, PoolState, QuoteBreakdown};
pub use stats::{lqt_share, PoolStats};

/// Scaling factor (1e6)
pub const SCALE: u64 = 1_000_000;

/// Decimal places implied by `SCALE`
pub const DECIMALS: usize = 6;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Newton steps behind every historical quote
pub const NEWTON_STEPS: u32 = 5;

/// Error types for pricing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CfmmError {
    /// A pool reserve is zero
    #[error("invalid reserves: cash and token pools must both be positive")]
    InvalidReserves,
    /// Amount is zero, negative, malformed, or too precise
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),
    /// Solver output would drain the output reserve
    #[error("insufficient liquidity for this trade size")]
    InsufficientLiquidity,
    /// Slippage tolerance above 100%
    #[error("slippage tolerance of {0} bps exceeds 10000 bps")]
    InvalidSlippage(u32),
    /// Fee factor outside (0, 1]
    #[error("invalid fee schedule {numerator}/{denominator}")]
    InvalidFee { numerator: u64, denominator: u64 },
    /// Arithmetic overflow
    #[error("arithmetic overflow")]
    Overflow,
}

pub type Result<T> = core::result::Result<T, CfmmError>;

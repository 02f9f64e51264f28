//! Pool statistics shown next to a quote

use serde::Serialize;

use crate::{Amount, CfmmError, PoolState, Result};

/// Headline numbers for a pool snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub cash_pool: Amount,
    pub token_pool: Amount,
    /// Cash per token
    pub current_price: f64,
    /// Both sides valued in cash: 2 × cash pool
    pub total_liquidity: Amount,
}

impl PoolStats {
    pub fn from_pool(pool: &PoolState) -> Result<Self> {
        pool.validate()?;
        Ok(Self {
            cash_pool: pool.cash_pool,
            token_pool: pool.token_pool,
            current_price: pool.cash_pool.as_f64() / pool.token_pool.as_f64(),
            total_liquidity: pool.cash_pool.checked_mul(2)?,
        })
    }
}

/// Percentage of issued LQT held by a user, rounded to 2 decimals
pub fn lqt_share(user_lqt: u64, pool: &PoolState) -> Result<f64> {
    if pool.lqt_total == 0 {
        return Err(CfmmError::InvalidReserves);
    }
    if user_lqt > pool.lqt_total {
        return Err(CfmmError::InvalidAmount("user LQT exceeds LQT issued"));
    }
    let percent = user_lqt as f64 / pool.lqt_total as f64 * 100.0;
    Ok((percent * 100.0).round() / 100.0)
}

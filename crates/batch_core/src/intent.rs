//! Trade intents: what the user asked for, before any approvals

use cfmm_model::{Amount, CfmmError, Direction, SlippageBps};

use crate::{Address, Deadline, Result};

// ============================================================================
// Swaps
// ============================================================================

/// A swap request. Created per user action and consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIntent {
    direction: Direction,
    /// Amount sold, in ledger units
    input_amount: Amount,
    slippage: SlippageBps,
    deadline: Deadline,
    /// Receives the bought asset
    recipient: Address,
}

impl TradeIntent {
    /// # Errors
    /// `InvalidAmount` when `input_amount` is zero.
    pub fn new(
        direction: Direction,
        input_amount: Amount,
        slippage: SlippageBps,
        deadline: Deadline,
        recipient: Address,
    ) -> Result<Self> {
        if input_amount.is_zero() {
            return Err(CfmmError::InvalidAmount("input amount must be positive").into());
        }
        Ok(Self {
            direction,
            input_amount,
            slippage,
            deadline,
            recipient,
        })
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Amount sold, never zero
    pub const fn input_amount(&self) -> Amount {
        self.input_amount
    }

    pub const fn slippage(&self) -> SlippageBps {
        self.slippage
    }

    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }
}

/// A swap intent bound to its owner and its on-chain guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOrder {
    /// Holder of the asset sold
    pub owner: Address,
    pub intent: TradeIntent,
    /// Minimum acceptable output, already floored
    pub min_output: Amount,
}

// ============================================================================
// Liquidity
// ============================================================================

/// Deposit cash and tokens for freshly minted LQT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityIntent {
    pub owner: Address,
    /// Unscaled LQT
    pub min_lqt_minted: u64,
    pub max_tokens_deposited: Amount,
    pub cash_deposited: Amount,
    pub deadline: Deadline,
}

/// Burn LQT for a share of both pools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityIntent {
    /// Holder of the LQT burned
    pub owner: Address,
    pub to: Address,
    /// Unscaled LQT
    pub lqt_burned: u64,
    pub min_cash_withdrawn: Amount,
    pub min_tokens_withdrawn: Amount,
    pub deadline: Deadline,
}

// ============================================================================
// Shapes
// ============================================================================

/// The four batch shapes the CFMM supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeShape {
    AddLiquidity(AddLiquidityIntent),
    RemoveLiquidity(RemoveLiquidityIntent),
    CashToToken(SwapOrder),
    TokenToCash(SwapOrder),
}

impl TradeShape {
    /// Swap shape matching the order's direction
    pub fn swap(order: SwapOrder) -> Self {
        match order.intent.direction() {
            Direction::CashToToken => TradeShape::CashToToken(order),
            Direction::TokenToCash => TradeShape::TokenToCash(order),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            TradeShape::AddLiquidity(_) => "addLiquidity",
            TradeShape::RemoveLiquidity(_) => "removeLiquidity",
            TradeShape::CashToToken(_) => "cashToToken",
            TradeShape::TokenToCash(_) => "tokenToCash",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BatchError;
    use chrono::{TimeZone, Utc};

    fn intent(direction: Direction, raw: u64) -> Result<TradeIntent> {
        TradeIntent::new(
            direction,
            Amount::from_raw(raw),
            SlippageBps::DEFAULT,
            Deadline::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            Address::parse("tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6").unwrap(),
        )
    }

    #[test]
    fn test_zero_input_rejected() {
        assert!(matches!(
            intent(Direction::CashToToken, 0),
            Err(BatchError::Quote(CfmmError::InvalidAmount(_)))
        ));
    }

    #[test]
    fn test_accessors_return_constructed_values() {
        let trade = intent(Direction::CashToToken, 1_000).unwrap();
        assert_eq!(trade.direction(), Direction::CashToToken);
        assert_eq!(trade.input_amount(), Amount::from_raw(1_000));
        assert_eq!(trade.slippage(), SlippageBps::DEFAULT);
        assert_eq!(trade.recipient().as_str(), "tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6");
        assert!(!trade.input_amount().is_zero());
    }

    #[test]
    fn test_swap_shape_follows_direction() {
        let owner = Address::parse("tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb").unwrap();
        let order = SwapOrder {
            owner,
            intent: intent(Direction::TokenToCash, 10).unwrap(),
            min_output: Amount::from_raw(9),
        };

        let shape = TradeShape::swap(order);
        assert_eq!(shape.name(), "tokenToCash");
        assert!(matches!(shape, TradeShape::TokenToCash(_)));
    }
}

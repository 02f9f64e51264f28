//! Protocol fee and user slippage factors
//!
//! Both are multiplicative and applied in this order: fee, then slippage.

use serde::{Deserialize, Serialize};

use crate::{CfmmError, Result, BPS_SCALE};

/// Fee kept by the pool, as the fraction of output the trader receives.
///
/// The protocol has always charged 0.05% (`9995/10000`). The value is not read
/// from pool storage today; it lives here so it can be once the contract
/// exposes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeeParts")]
pub struct FeeSchedule {
    numerator: u64,
    denominator: u64,
}

#[derive(Deserialize)]
struct FeeParts {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<FeeParts> for FeeSchedule {
    type Error = CfmmError;

    fn try_from(parts: FeeParts) -> Result<Self> {
        Self::new(parts.numerator, parts.denominator)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::HISTORICAL
    }
}

impl FeeSchedule {
    /// 0.05% fee
    pub const HISTORICAL: Self = Self {
        numerator: 9_995,
        denominator: 10_000,
    };

    pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
        if denominator == 0 || numerator == 0 || numerator > denominator {
            return Err(CfmmError::InvalidFee {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    pub const fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `raw · numerator / denominator`, multiplied first as historical quotes were
    pub fn apply(&self, raw: f64) -> f64 {
        (self.numerator as f64 * raw) / self.denominator as f64
    }
}

/// Slippage tolerance in basis points (20 = 0.2%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlippageBps(u32);

impl TryFrom<u32> for SlippageBps {
    type Error = CfmmError;

    fn try_from(bps: u32) -> Result<Self> {
        Self::new(bps)
    }
}

impl From<SlippageBps> for u32 {
    fn from(bps: SlippageBps) -> Self {
        bps.0
    }
}

impl Default for SlippageBps {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SlippageBps {
    /// 0.2%
    pub const DEFAULT: Self = Self(20);

    pub const ZERO: Self = Self(0);

    pub fn new(bps: u32) -> Result<Self> {
        if u64::from(bps) > BPS_SCALE {
            return Err(CfmmError::InvalidSlippage(bps));
        }
        Ok(Self(bps))
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `expected · (1 - bps / 10000)`
    pub fn apply(&self, expected: f64) -> f64 {
        expected * (1.0 - self.0 as f64 / BPS_SCALE as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_historical_fee() {
        assert_eq!(FeeSchedule::default().apply(10_000.0), 9_995.0);
        assert_eq!(FeeSchedule::default(), FeeSchedule::new(9_995, 10_000).unwrap());
    }

    #[test]
    fn test_fee_validation() {
        assert!(FeeSchedule::new(1, 0).is_err());
        assert!(FeeSchedule::new(0, 10).is_err());
        assert!(FeeSchedule::new(11, 10).is_err());
        assert!(FeeSchedule::new(10, 10).is_ok());
    }

    #[test]
    fn test_slippage() {
        assert_eq!(SlippageBps::new(100).unwrap().apply(1_000.0), 990.0);
        assert_eq!(SlippageBps::ZERO.apply(1_000.0), 1_000.0);
        assert_eq!(SlippageBps::new(10_000).unwrap().apply(1_000.0), 0.0);
        assert_eq!(SlippageBps::new(10_001), Err(CfmmError::InvalidSlippage(10_001)));
        assert_eq!(SlippageBps::default().as_percent(), 0.2);
    }

    #[test]
    fn test_deserialize_validates() {
        let fee: FeeSchedule =
            serde_json::from_str(r#"{"numerator":9995,"denominator":10000}"#).unwrap();
        assert_eq!(fee, FeeSchedule::HISTORICAL);
        assert!(serde_json::from_str::<FeeSchedule>(r#"{"numerator":1,"denominator":0}"#).is_err());
        assert!(serde_json::from_str::<FeeSchedule>(r#"{"numerator":3,"denominator":2}"#).is_err());

        assert_eq!(serde_json::from_str::<SlippageBps>("50").unwrap().get(), 50);
        assert!(serde_json::from_str::<SlippageBps>("20000").is_err());
        assert_eq!(serde_json::to_string(&SlippageBps::DEFAULT).unwrap(), "20");
    }
}

//! Fixed-point asset amounts (6 decimals)

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CfmmError, Result, DECIMALS, SCALE};

/// An asset amount in ledger units (1 unit = 1e-6 of the asset).
///
/// Human input is parsed exactly from its decimal string; nothing goes
/// through `f64` on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Wrap a raw ledger integer.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Whole asset units, scaled by `SCALE`.
    pub fn from_units(units: u64) -> Result<Self> {
        units.checked_mul(SCALE).map(Self).ok_or(CfmmError::Overflow)
    }

    /// Floor a solver output (already in ledger units) to an integer amount.
    ///
    /// Rounding down keeps every on-chain minimum at least as strict as the
    /// off-chain quote.
    pub fn from_raw_floor(value: f64) -> Result<Self> {
        if value.is_nan() || value < 0.0 {
            return Err(CfmmError::InvalidAmount("negative or undefined amount"));
        }
        let floored = value.floor();
        if floored >= u64::MAX as f64 {
            return Err(CfmmError::Overflow);
        }
        Ok(Self(floored as u64))
    }

    /// Raw ledger integer
    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Ledger units as `f64`, the solver's working type
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Human-scale value, for display only
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0.checked_add(other.0).map(Self).ok_or(CfmmError::Overflow)
    }

    pub fn checked_mul(self, factor: u64) -> Result<Self> {
        self.0.checked_mul(factor).map(Self).ok_or(CfmmError::Overflow)
    }
}

impl FromStr for Amount {
    type Err = CfmmError;

    /// Parse `"12.5"`, `"0.000001"`, `"3"` into ledger units.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(CfmmError::InvalidAmount("empty amount"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CfmmError::InvalidAmount("amount must be a non-negative decimal"));
        }
        if frac.len() > DECIMALS {
            return Err(CfmmError::InvalidAmount("more than 6 decimal places"));
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| CfmmError::Overflow)?
        };
        let frac: u64 = if frac.is_empty() {
            0
        } else {
            // "5" -> 500000
            let padded = format!("{:0<width$}", frac, width = DECIMALS);
            padded.parse().map_err(|_| CfmmError::Overflow)?
        };

        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or(CfmmError::Overflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.0 / SCALE, self.0 % SCALE)
    }
}

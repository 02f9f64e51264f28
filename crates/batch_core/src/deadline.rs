//! Trade deadlines, enforced on-chain

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::{BatchError, Result};

/// One year; keeps `Duration::minutes` in range
const MAX_DEADLINE_MINUTES: i64 = 60 * 24 * 365;

/// Moment after which the contract refuses to execute the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    pub const fn at(time: DateTime<Utc>) -> Self {
        Self(time)
    }

    /// `now + minutes`
    pub fn minutes_from(now: DateTime<Utc>, minutes: i64) -> Result<Self> {
        if minutes < 0 {
            return Err(BatchError::InvalidDeadline("timeout must not be negative"));
        }
        if minutes > MAX_DEADLINE_MINUTES {
            return Err(BatchError::InvalidDeadline("timeout longer than a year"));
        }
        now.checked_add_signed(Duration::minutes(minutes))
            .map(Self)
            .ok_or(BatchError::InvalidDeadline("timestamp out of range"))
    }

    pub const fn time(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.0
    }

    /// ISO-8601 UTC with milliseconds, e.g. `2024-01-01T00:20:00.000Z`
    pub fn to_ledger(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_ledger())
    }
}

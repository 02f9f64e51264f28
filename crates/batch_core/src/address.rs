//! Ledger account and contract addresses

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BatchError, Result};

/// Implicit (`tz1`/`tz2`/`tz3`) and originated (`KT1`) prefixes
const PREFIXES: [&str; 4] = ["tz1", "tz2", "tz3", "KT1"];

/// Base58 length of every accepted address
const ENCODED_LEN: usize = 36;

/// 3-byte prefix + 20-byte hash, once the 4-byte checksum is stripped
const PAYLOAD_LEN: usize = 23;

/// A base58 ledger address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != ENCODED_LEN || !PREFIXES.iter().any(|p| s.starts_with(p)) {
            return Err(BatchError::InvalidAddress(s.to_string()));
        }

        // base58check: double-SHA256 checksum over the payload
        let payload = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|_| BatchError::InvalidAddress(s.to_string()))?;
        if payload.len() != PAYLOAD_LEN {
            return Err(BatchError::InvalidAddress(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Originated contract (`KT1…`)
    pub fn is_contract(&self) -> bool {
        self.0.starts_with("KT1")
    }
}

impl FromStr for Address {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = BatchError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Contract handles and the CFMM storage they are resolved from

use core::fmt;

use cfmm_model::{Amount, PoolState};
use serde::{Deserialize, Serialize};

use crate::{Address, BatchError, Result};

/// The four contracts a batch can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractRole {
    /// The CFMM itself; spender and operator for every approval
    Cfmm,
    /// Cash asset (FA1.2)
    Cash,
    /// Token asset (FA2)
    Token,
    /// Liquidity token (FA1.2)
    Lqt,
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractRole::Cfmm => "cfmm",
            ContractRole::Cash => "cash (FA1.2)",
            ContractRole::Token => "token (FA2)",
            ContractRole::Lqt => "lqt (FA1.2)",
        };
        f.write_str(name)
    }
}

/// CFMM storage as read from the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfmmStorage {
    pub cash_pool: Amount,
    pub token_pool: Amount,
    pub lqt_total: u64,
    #[serde(default)]
    pub cash_address: Option<Address>,
    #[serde(default)]
    pub token_address: Option<Address>,
    #[serde(default)]
    pub lqt_address: Option<Address>,
}

impl CfmmStorage {
    pub fn pool_state(&self) -> PoolState {
        PoolState::new(self.cash_pool, self.token_pool, self.lqt_total)
    }
}

/// Resolved addresses of every contract a batch may target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractHandles {
    cfmm: Address,
    cash: Address,
    token: Address,
    lqt: Address,
    /// FA2 token id traded by the pool
    token_id: u64,
}

impl ContractHandles {
    pub fn new(cfmm: Address, cash: Address, token: Address, lqt: Address, token_id: u64) -> Self {
        Self {
            cfmm,
            cash,
            token,
            lqt,
            token_id,
        }
    }

    /// Resolve handles from the CFMM address and its storage.
    ///
    /// # Errors
    /// `UninitializedContract` naming the first address that is missing.
    pub fn from_storage(
        cfmm: Option<Address>,
        storage: &CfmmStorage,
        token_id: u64,
    ) -> Result<Self> {
        let require = |address: Option<&Address>, role| {
            address
                .cloned()
                .ok_or(BatchError::UninitializedContract { role })
        };

        Ok(Self {
            cfmm: require(cfmm.as_ref(), ContractRole::Cfmm)?,
            cash: require(storage.cash_address.as_ref(), ContractRole::Cash)?,
            token: require(storage.token_address.as_ref(), ContractRole::Token)?,
            lqt: require(storage.lqt_address.as_ref(), ContractRole::Lqt)?,
            token_id,
        })
    }

    pub fn cfmm(&self) -> &Address {
        &self.cfmm
    }

    pub fn cash(&self) -> &Address {
        &self.cash
    }

    pub fn token(&self) -> &Address {
        &self.token
    }

    pub fn lqt(&self) -> &Address {
        &self.lqt
    }

    pub fn token_id(&self) -> u64 {
        self.token_id
    }

    pub fn address(&self, role: ContractRole) -> &Address {
        match role {
            ContractRole::Cfmm => &self.cfmm,
            ContractRole::Cash => &self.cash,
            ContractRole::Token => &self.token,
            ContractRole::Lqt => &self.lqt,
        }
    }
}

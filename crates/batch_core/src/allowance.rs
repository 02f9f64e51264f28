//! FA1.2 allowance snapshots and reconciliation
//!
//! FA1.2 only offers `approve(spender, value)`, which overwrites. Many
//! implementations refuse a change from one non-zero value to another, so a
//! short allowance is first reset to zero and then set:
//!
//! - current >= required    → nothing
//! - 0 < current < required → approve(0), approve(required)
//! - current == 0           → approve(required)

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::{Address, BatchError, OperationDescriptor, Result};

/// Allowance as fetched from a token contract's storage.
///
/// `current` is signed so a corrupt negative value read off the ledger is
/// reported instead of silently wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSnapshot {
    pub contract: Address,
    pub owner: Address,
    pub spender: Address,
    pub current: i128,
}

impl AllowanceSnapshot {
    pub fn new(contract: Address, owner: Address, spender: Address, current: i128) -> Self {
        Self {
            contract,
            owner,
            spender,
            current,
        }
    }

    /// Allowance in ledger units.
    ///
    /// # Errors
    /// `InvalidAllowanceState` if the ledger reported a negative value.
    pub fn validated(&self) -> Result<u64> {
        if self.current < 0 {
            error!(
                "negative allowance {} on {} for owner {} spender {}",
                self.current, self.contract, self.owner, self.spender
            );
            return Err(BatchError::InvalidAllowanceState {
                contract: self.contract.clone(),
                value: self.current,
            });
        }
        // Anything past u64 covers every amount a batch can request
        Ok(u64::try_from(self.current).unwrap_or(u64::MAX))
    }
}

/// Approval state for one assembly call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowanceState {
    /// Cash (FA1.2) allowance owner → CFMM
    pub cash: Option<AllowanceSnapshot>,
    /// LQT (FA1.2) allowance owner → CFMM
    pub lqt: Option<AllowanceSnapshot>,
    /// Whether the CFMM is already an FA2 operator. Informational only:
    /// operator grants are bracketed regardless.
    pub token_operator: Option<bool>,
}

impl AllowanceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cash(mut self, snapshot: AllowanceSnapshot) -> Self {
        self.cash = Some(snapshot);
        self
    }

    pub fn with_lqt(mut self, snapshot: AllowanceSnapshot) -> Self {
        self.lqt = Some(snapshot);
        self
    }

    pub fn with_token_operator(mut self, is_operator: bool) -> Self {
        self.token_operator = Some(is_operator);
        self
    }
}

/// Approvals needed to bring an allowance up to a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowancePlan {
    /// Existing allowance already covers the trade
    Sufficient,
    /// Allowance is zero: set it
    Grant { amount: u64 },
    /// Allowance is short but non-zero: zero it, then set it
    ResetAndGrant { amount: u64 },
}

impl AllowancePlan {
    pub const fn new(current: u64, required: u64) -> Self {
        if current >= required {
            AllowancePlan::Sufficient
        } else if current > 0 {
            AllowancePlan::ResetAndGrant { amount: required }
        } else {
            AllowancePlan::Grant { amount: required }
        }
    }

    pub fn into_operations(
        self,
        contract: &Address,
        spender: &Address,
    ) -> Vec<OperationDescriptor> {
        match self {
            AllowancePlan::Sufficient => Vec::new(),
            AllowancePlan::Grant { amount } => {
                vec![OperationDescriptor::set_allowance(contract, spender, amount)]
            }
            AllowancePlan::ResetAndGrant { amount } => vec![
                OperationDescriptor::set_allowance(contract, spender, 0),
                OperationDescriptor::set_allowance(contract, spender, amount),
            ],
        }
    }
}

/// Approvals on `contract` letting `spender` pull `required`.
pub fn reconcile(
    contract: &Address,
    spender: &Address,
    current: u64,
    required: u64,
) -> Vec<OperationDescriptor> {
    let plan = AllowancePlan::new(current, required);
    debug!(
        "allowance on {}: current={} required={} -> {:?}",
        contract, current, required, plan
    );
    plan.into_operations(contract, spender)
}

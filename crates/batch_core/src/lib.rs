//! Batch Core - Ordered operation batches for the CFMM
//!
//! This crate turns a trade intent plus a fresh allowance snapshot into the
//! exact list of ledger operations that executes it as one atomic batch.
//!
//! # Design Principles
//! - Pure: no I/O; the caller fetches state before and submits after
//! - Order is the contract: allowance resets precede grants, operator grants
//!   bracket exactly one call
//! - No standing authority: every batch that touches an approval ends by
//!   revoking it
//! - Contract handles are required at construction, never global

pub mod address;
pub mod allowance;
pub mod assembler;
pub mod deadline;
pub mod handles;
pub mod intent;
pub mod operation;
pub mod operator;
pub mod planner;

pub use address::Address;
pub use allowance::{reconcile, AllowancePlan, AllowanceSnapshot, AllowanceState};
pub use assembler::{Batch, BatchAssembler};
pub use deadline::Deadline;
pub use handles::{CfmmStorage, ContractHandles, ContractRole};
pub use intent::{AddLiquidityIntent, RemoveLiquidityIntent, SwapOrder, TradeIntent, TradeShape};
pub use operation::{
    Entrypoint, LiquidityArgs, OperationDescriptor, OperatorAction, SwapArgs, TransferParams,
};
pub use planner::{SwapPlan, SwapPlanner};

use cfmm_model::{CfmmError, Direction};

/// Errors raised while assembling a batch.
///
/// None of these are retryable: the same request fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// A contract address was never resolved
    #[error("{role} contract is not initialized")]
    UninitializedContract { role: ContractRole },

    /// Ledger reported a negative allowance
    #[error("allowance on {contract} is negative ({value}); storage is corrupt")]
    InvalidAllowanceState { contract: Address, value: i128 },

    /// The trade needs an allowance that wasn't fetched
    #[error("no allowance snapshot for the {asset} contract")]
    MissingAllowance { asset: ContractRole },

    /// Snapshot belongs to a different contract, owner or spender
    #[error("allowance snapshot {field} is {found}, expected {expected}")]
    SnapshotMismatch {
        field: &'static str,
        expected: Address,
        found: Address,
    },

    /// Swap shape and intent disagree on direction
    #[error("{shape} batch cannot carry a {direction:?} intent")]
    DirectionMismatch {
        shape: &'static str,
        direction: Direction,
    },

    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    #[error("invalid deadline: {0}")]
    InvalidDeadline(&'static str),

    #[error(transparent)]
    Quote(#[from] CfmmError),
}

impl BatchError {
    /// Ledger data contradicts itself, as opposed to a malformed request
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, BatchError::InvalidAllowanceState { .. })
    }
}

pub type Result<T> = core::result::Result<T, BatchError>;

//! FA2 operator bracketing
//!
//! A call that moves the owner's FA2 tokens is wrapped in
//! `add_operator` / `remove_operator`, whatever the current operator state.
//! The batch therefore never leaves the CFMM with standing authority, even
//! when an earlier batch failed to clean up.

use crate::{Address, ContractHandles, OperationDescriptor, OperatorAction};

/// `update_operators` on the token contract for the CFMM
pub fn set_operator(
    handles: &ContractHandles,
    owner: &Address,
    action: OperatorAction,
) -> OperationDescriptor {
    OperationDescriptor::SetOperator {
        contract: handles.token().clone(),
        owner: owner.clone(),
        operator: handles.cfmm().clone(),
        token_id: handles.token_id(),
        action,
    }
}

/// `[add, call, remove]`
pub fn bracket(
    handles: &ContractHandles,
    owner: &Address,
    call: OperationDescriptor,
) -> [OperationDescriptor; 3] {
    [
        set_operator(handles, owner, OperatorAction::Add),
        call,
        set_operator(handles, owner, OperatorAction::Remove),
    ]
}

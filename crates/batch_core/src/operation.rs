//! Operation descriptors: one entry of an assembled batch
//!
//! Entrypoint names and argument order are fixed by the deployed contracts:
//! - FA1.2 `approve(spender, value)`
//! - FA2 `update_operators([add_operator | remove_operator {owner, operator, token_id}])`
//! - CFMM `addLiquidity(owner, minLqtMinted, maxTokensDeposited, cashDeposited, deadline)`
//! - CFMM `removeLiquidity(to, lqtBurned, minCashWithdrawn, minTokensWithdrawn, deadline)`
//! - CFMM `cashToToken(to, minTokensBought, cashSold, deadline)`
//! - CFMM `tokenToCash(to, tokensSold, minCashBought, deadline)`

use serde::Serialize;
use serde_json::{json, Value};

use crate::{Address, Deadline};

/// Contract entrypoints a batch can call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Entrypoint {
    #[serde(rename = "approve")]
    Approve,
    #[serde(rename = "update_operators")]
    UpdateOperators,
    #[serde(rename = "addLiquidity")]
    AddLiquidity,
    #[serde(rename = "removeLiquidity")]
    RemoveLiquidity,
    #[serde(rename = "cashToToken")]
    CashToToken,
    #[serde(rename = "tokenToCash")]
    TokenToCash,
}

impl Entrypoint {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Entrypoint::Approve => "approve",
            Entrypoint::UpdateOperators => "update_operators",
            Entrypoint::AddLiquidity => "addLiquidity",
            Entrypoint::RemoveLiquidity => "removeLiquidity",
            Entrypoint::CashToToken => "cashToToken",
            Entrypoint::TokenToCash => "tokenToCash",
        }
    }
}

/// FA2 operator update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorAction {
    Add,
    Remove,
}

impl OperatorAction {
    /// Variant name in `update_operators`
    pub const fn key(&self) -> &'static str {
        match self {
            OperatorAction::Add => "add_operator",
            OperatorAction::Remove => "remove_operator",
        }
    }
}

/// Arguments of a swap call, in ledger units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapArgs {
    #[serde(rename_all = "camelCase")]
    CashToToken {
        to: Address,
        min_tokens_bought: u64,
        cash_sold: u64,
        deadline: Deadline,
    },
    #[serde(rename_all = "camelCase")]
    TokenToCash {
        to: Address,
        tokens_sold: u64,
        min_cash_bought: u64,
        deadline: Deadline,
    },
}

impl SwapArgs {
    pub const fn entrypoint(&self) -> Entrypoint {
        match self {
            SwapArgs::CashToToken { .. } => Entrypoint::CashToToken,
            SwapArgs::TokenToCash { .. } => Entrypoint::TokenToCash,
        }
    }

    fn positional(&self) -> Vec<Value> {
        match self {
            SwapArgs::CashToToken {
                to,
                min_tokens_bought,
                cash_sold,
                deadline,
            } => vec![json!(to), json!(min_tokens_bought), json!(cash_sold), json!(deadline)],
            SwapArgs::TokenToCash {
                to,
                tokens_sold,
                min_cash_bought,
                deadline,
            } => vec![json!(to), json!(tokens_sold), json!(min_cash_bought), json!(deadline)],
        }
    }
}

/// Arguments of a liquidity call. LQT quantities are unscaled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LiquidityArgs {
    #[serde(rename_all = "camelCase")]
    Add {
        owner: Address,
        min_lqt_minted: u64,
        max_tokens_deposited: u64,
        cash_deposited: u64,
        deadline: Deadline,
    },
    #[serde(rename_all = "camelCase")]
    Remove {
        to: Address,
        lqt_burned: u64,
        min_cash_withdrawn: u64,
        min_tokens_withdrawn: u64,
        deadline: Deadline,
    },
}

impl LiquidityArgs {
    pub const fn entrypoint(&self) -> Entrypoint {
        match self {
            LiquidityArgs::Add { .. } => Entrypoint::AddLiquidity,
            LiquidityArgs::Remove { .. } => Entrypoint::RemoveLiquidity,
        }
    }

    fn positional(&self) -> Vec<Value> {
        match self {
            LiquidityArgs::Add {
                owner,
                min_lqt_minted,
                max_tokens_deposited,
                cash_deposited,
                deadline,
            } => vec![
                json!(owner),
                json!(min_lqt_minted),
                json!(max_tokens_deposited),
                json!(cash_deposited),
                json!(deadline),
            ],
            LiquidityArgs::Remove {
                to,
                lqt_burned,
                min_cash_withdrawn,
                min_tokens_withdrawn,
                deadline,
            } => vec![
                json!(to),
                json!(lqt_burned),
                json!(min_cash_withdrawn),
                json!(min_tokens_withdrawn),
                json!(deadline),
            ],
        }
    }
}

/// One operation of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationDescriptor {
    /// FA1.2 `approve`
    SetAllowance {
        contract: Address,
        spender: Address,
        amount: u64,
    },
    /// FA2 `update_operators` with a single update
    SetOperator {
        contract: Address,
        owner: Address,
        operator: Address,
        token_id: u64,
        action: OperatorAction,
    },
    InvokeSwap {
        contract: Address,
        entrypoint: Entrypoint,
        args: SwapArgs,
    },
    InvokeLiquidity {
        contract: Address,
        entrypoint: Entrypoint,
        args: LiquidityArgs,
    },
}

impl OperationDescriptor {
    pub fn set_allowance(contract: &Address, spender: &Address, amount: u64) -> Self {
        OperationDescriptor::SetAllowance {
            contract: contract.clone(),
            spender: spender.clone(),
            amount,
        }
    }

    pub fn swap(contract: &Address, args: SwapArgs) -> Self {
        OperationDescriptor::InvokeSwap {
            contract: contract.clone(),
            entrypoint: args.entrypoint(),
            args,
        }
    }

    pub fn liquidity(contract: &Address, args: LiquidityArgs) -> Self {
        OperationDescriptor::InvokeLiquidity {
            contract: contract.clone(),
            entrypoint: args.entrypoint(),
            args,
        }
    }

    /// Contract the operation is sent to
    pub fn contract(&self) -> &Address {
        match self {
            OperationDescriptor::SetAllowance { contract, .. }
            | OperationDescriptor::SetOperator { contract, .. }
            | OperationDescriptor::InvokeSwap { contract, .. }
            | OperationDescriptor::InvokeLiquidity { contract, .. } => contract,
        }
    }

    pub fn entrypoint(&self) -> Entrypoint {
        match self {
            OperationDescriptor::SetAllowance { .. } => Entrypoint::Approve,
            OperationDescriptor::SetOperator { .. } => Entrypoint::UpdateOperators,
            OperationDescriptor::InvokeSwap { entrypoint, .. }
            | OperationDescriptor::InvokeLiquidity { entrypoint, .. } => *entrypoint,
        }
    }

    /// Allowance set to zero or operator removed
    pub fn is_revocation(&self) -> bool {
        matches!(
            self,
            OperationDescriptor::SetAllowance { amount: 0, .. }
                | OperationDescriptor::SetOperator {
                    action: OperatorAction::Remove,
                    ..
                }
        )
    }

    /// Contract call in the shape the submission side sends it
    pub fn transfer_params(&self) -> TransferParams {
        let args = match self {
            OperationDescriptor::SetAllowance { spender, amount, .. } => {
                vec![json!(spender), json!(amount)]
            }
            OperationDescriptor::SetOperator {
                owner,
                operator,
                token_id,
                action,
                ..
            } => vec![json!([{
                action.key(): {
                    "owner": owner,
                    "operator": operator,
                    "token_id": token_id,
                }
            }])],
            OperationDescriptor::InvokeSwap { args, .. } => args.positional(),
            OperationDescriptor::InvokeLiquidity { args, .. } => args.positional(),
        };

        TransferParams {
            to: self.contract().clone(),
            entrypoint: self.entrypoint(),
            args,
        }
    }
}

/// Destination, entrypoint and positional arguments of one contract call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferParams {
    pub to: Address,
    pub entrypoint: Entrypoint,
    pub args: Vec<Value>,
}

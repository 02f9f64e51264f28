//! Liquidity provider operations and pool statistics

use anyhow::{Context, Result};
use batch_core::{
    AddLiquidityIntent, AllowanceSnapshot, AllowanceState, BatchAssembler, RemoveLiquidityIntent,
    TradeShape,
};
use cfmm_model::{lqt_share, Amount, PoolStats};
use colored::Colorize;
use std::path::Path;

use crate::client::{self, format_address};
use crate::config::Config;

fn parse_amount(s: &str, what: &str) -> Result<Amount> {
    s.parse().with_context(|| format!("Invalid {}: {}", what, s))
}

pub fn show_stats(storage: &Path, user_lqt: Option<u64>) -> Result<()> {
    println!("{}", "=== Pool Statistics ===".bright_green().bold());

    let pool = client::load_storage(storage)?.pool_state();
    let stats = PoolStats::from_pool(&pool)?;

    println!("{} {}", "Cash Pool:".bright_cyan(), stats.cash_pool);
    println!("{} {}", "Token Pool:".bright_cyan(), stats.token_pool);
    println!("{} {:.6} cash/token", "Price:".bright_cyan(), stats.current_price);
    println!("{} {} cash", "Total Liquidity:".bright_cyan(), stats.total_liquidity);
    println!("{} {}", "LQT Issued:".bright_cyan(), pool.lqt_total);

    if let Some(lqt) = user_lqt {
        println!("{} {}%", "Your Share:".bright_cyan(), lqt_share(lqt, &pool)?);
    }
    Ok(())
}

/// Everything needed to assemble an addLiquidity batch
pub struct AddLiquidityRequest<'a> {
    pub storage: &'a Path,
    pub cfmm: Option<&'a str>,
    pub owner: &'a str,
    pub cash_deposited: &'a str,
    pub max_tokens_deposited: &'a str,
    pub min_lqt_minted: u64,
    /// Current cash allowance owner → CFMM, raw units
    pub allowance: i128,
    pub deadline_minutes: Option<i64>,
    pub json: bool,
}

pub fn add_liquidity(config: &Config, req: AddLiquidityRequest<'_>) -> Result<()> {
    if !req.json {
        println!("{}", "=== Add Liquidity ===".bright_green().bold());
    }

    let storage = client::load_storage(req.storage)?;
    let handles = client::resolve_handles(config, req.cfmm, &storage)?;
    let owner = client::parse_address(req.owner, "owner")?;

    let intent = AddLiquidityIntent {
        owner: owner.clone(),
        min_lqt_minted: req.min_lqt_minted,
        max_tokens_deposited: parse_amount(req.max_tokens_deposited, "max tokens deposited")?,
        cash_deposited: parse_amount(req.cash_deposited, "cash deposited")?,
        deadline: client::deadline(config, req.deadline_minutes)?,
    };
    let allowances = AllowanceState::new().with_cash(AllowanceSnapshot::new(
        handles.cash().clone(),
        owner.clone(),
        handles.cfmm().clone(),
        req.allowance,
    ));

    if !req.json {
        client::print_handles(&handles);
        println!("{} {}", "Owner:".bright_cyan(), format_address(&owner));
        println!("{} {} cash", "Deposit:".bright_cyan(), intent.cash_deposited);
        println!("{} {} tokens", "Max Tokens:".bright_cyan(), intent.max_tokens_deposited);
        println!("{} {}", "Min LQT:".bright_cyan(), intent.min_lqt_minted);
    }

    let batch =
        BatchAssembler::new(handles).assemble(&TradeShape::AddLiquidity(intent), &allowances)?;
    client::print_batch(&batch, req.json)
}

/// Everything needed to assemble a removeLiquidity batch
pub struct RemoveLiquidityRequest<'a> {
    pub storage: &'a Path,
    pub cfmm: Option<&'a str>,
    pub owner: &'a str,
    pub to: Option<&'a str>,
    pub lqt_burned: u64,
    pub min_cash_withdrawn: &'a str,
    pub min_tokens_withdrawn: &'a str,
    /// Current LQT allowance owner → CFMM, unscaled
    pub allowance: i128,
    pub deadline_minutes: Option<i64>,
    pub json: bool,
}

pub fn remove_liquidity(config: &Config, req: RemoveLiquidityRequest<'_>) -> Result<()> {
    if !req.json {
        println!("{}", "=== Remove Liquidity ===".bright_green().bold());
    }

    let storage = client::load_storage(req.storage)?;
    let handles = client::resolve_handles(config, req.cfmm, &storage)?;
    let owner = client::parse_address(req.owner, "owner")?;
    let to = match req.to {
        Some(s) => client::parse_address(s, "recipient")?,
        None => owner.clone(),
    };

    let intent = RemoveLiquidityIntent {
        owner: owner.clone(),
        to,
        lqt_burned: req.lqt_burned,
        min_cash_withdrawn: parse_amount(req.min_cash_withdrawn, "min cash withdrawn")?,
        min_tokens_withdrawn: parse_amount(req.min_tokens_withdrawn, "min tokens withdrawn")?,
        deadline: client::deadline(config, req.deadline_minutes)?,
    };
    let allowances = AllowanceState::new().with_lqt(AllowanceSnapshot::new(
        handles.lqt().clone(),
        owner.clone(),
        handles.cfmm().clone(),
        req.allowance,
    ));

    if !req.json {
        client::print_handles(&handles);
        println!("{} {}", "Owner:".bright_cyan(), format_address(&owner));
        println!("{} {}", "LQT Burned:".bright_cyan(), intent.lqt_burned);
        println!("{} {} cash", "Min Cash:".bright_cyan(), intent.min_cash_withdrawn);
        println!("{} {} tokens", "Min Tokens:".bright_cyan(), intent.min_tokens_withdrawn);
    }

    let batch =
        BatchAssembler::new(handles).assemble(&TradeShape::RemoveLiquidity(intent), &allowances)?;
    client::print_batch(&batch, req.json)
}

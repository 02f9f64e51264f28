//! Quotes and swap batches

use anyhow::{Context, Result};
use batch_core::{AllowanceSnapshot, AllowanceState, BatchAssembler, SwapPlanner, TradeIntent};
use cfmm_model::{Amount, Direction, PoolState, QuoteBreakdown, SlippageBps};
use colored::Colorize;
use std::path::Path;

use crate::client::{self, format_address};
use crate::config::Config;

fn assets(direction: Direction) -> (&'static str, &'static str) {
    match direction {
        Direction::CashToToken => ("cash", "token"),
        Direction::TokenToCash => ("token", "cash"),
    }
}

fn slippage(config: &Config, bps: Option<u32>) -> Result<SlippageBps> {
    match bps {
        Some(bps) => Ok(SlippageBps::new(bps)?),
        None => config.settings.trade.slippage(),
    }
}

fn print_quote(quote: &QuoteBreakdown, slippage: SlippageBps) -> Result<()> {
    let (sold, bought) = assets(quote.direction);
    println!("{} {} {}", "Input:".bright_cyan(), quote.input, sold);
    println!("{} {} {}", "Expected:".bright_cyan(), quote.expected_amount()?, bought);
    println!(
        "{} {} {} ({}% slippage)",
        "Minimum:".bright_cyan(),
        quote.minimum_output,
        bought,
        slippage.as_percent()
    );
    Ok(())
}

/// Estimate the output of a swap against a storage snapshot
pub fn quote(
    config: &Config,
    storage: &Path,
    direction: Direction,
    amount: &str,
    slippage_bps: Option<u32>,
) -> Result<()> {
    println!("{}", "=== Quote ===".bright_green().bold());

    let pool: PoolState = client::load_storage(storage)?.pool_state();
    let input: Amount = amount.parse().with_context(|| format!("Invalid amount: {}", amount))?;
    let slippage = slippage(config, slippage_bps)?;
    let fee = config.settings.trade.fee()?;

    let quote = cfmm_model::estimate(&pool, direction, input, fee, slippage)?;
    print_quote(&quote, slippage)?;
    Ok(())
}

/// Everything needed to assemble a swap batch
pub struct SwapRequest<'a> {
    pub storage: &'a Path,
    pub cfmm: Option<&'a str>,
    pub direction: Direction,
    pub amount: &'a str,
    pub owner: &'a str,
    pub recipient: Option<&'a str>,
    /// Current cash allowance owner → CFMM, raw units
    pub allowance: i128,
    pub slippage_bps: Option<u32>,
    pub deadline_minutes: Option<i64>,
    pub json: bool,
}

/// Quote a swap and print the batch that executes it
pub fn swap(config: &Config, req: SwapRequest<'_>) -> Result<()> {
    if !req.json {
        println!("{}", "=== Swap ===".bright_green().bold());
    }

    let storage = client::load_storage(req.storage)?;
    let handles = client::resolve_handles(config, req.cfmm, &storage)?;
    let owner = client::parse_address(req.owner, "owner")?;
    let recipient = match req.recipient {
        Some(s) => client::parse_address(s, "recipient")?,
        None => owner.clone(),
    };

    let input: Amount = req
        .amount
        .parse()
        .with_context(|| format!("Invalid amount: {}", req.amount))?;
    let slippage = slippage(config, req.slippage_bps)?;
    let intent = TradeIntent::new(
        req.direction,
        input,
        slippage,
        client::deadline(config, req.deadline_minutes)?,
        recipient.clone(),
    )?;

    // Only cash-to-token spends an FA1.2 allowance
    let allowances = AllowanceState::new().with_cash(AllowanceSnapshot::new(
        handles.cash().clone(),
        owner.clone(),
        handles.cfmm().clone(),
        req.allowance,
    ));

    let planner =
        SwapPlanner::new(BatchAssembler::new(handles)).with_fee(config.settings.trade.fee()?);
    let plan = planner.plan(&storage.pool_state(), &owner, intent, &allowances)?;

    if !req.json {
        println!("{} {}", "Owner:".bright_cyan(), format_address(&owner));
        println!("{} {}", "Recipient:".bright_cyan(), format_address(&recipient));
        print_quote(&plan.quote, slippage)?;
    }
    client::print_batch(&plan.batch, req.json)
}

//! Snapshot loading, handle resolution and output helpers

use anyhow::{Context, Result};
use batch_core::{
    Address, Batch, CfmmStorage, ContractHandles, ContractRole, Deadline, OperationDescriptor,
};
use chrono::Utc;
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::Config;

/// Read a CFMM storage snapshot (`cashPool`, `tokenPool`, `lqtTotal`, addresses)
pub fn load_storage(path: &Path) -> Result<CfmmStorage> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read storage snapshot: {}", path.display()))?;

    serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse storage snapshot: {}", path.display()))
}

/// Contract handles from the snapshot, with configured addresses taking precedence.
///
/// `cfmm` is the `--cfmm` flag; it wins over `[contracts] cfmm`.
pub fn resolve_handles(
    config: &Config,
    cfmm: Option<&str>,
    storage: &CfmmStorage,
) -> Result<ContractHandles> {
    let contracts = &config.settings.contracts;
    let cfmm = match cfmm {
        Some(s) => Some(Address::parse(s).context("--cfmm")?),
        None => contracts.address(ContractRole::Cfmm)?,
    };
    let merged = contracts.overlay(storage)?;

    ContractHandles::from_storage(cfmm, &merged, contracts.token_id)
        .context("Set the address in the storage snapshot, the config file, or with --cfmm")
}

pub fn parse_address(s: &str, what: &str) -> Result<Address> {
    Address::parse(s).with_context(|| format!("Invalid {} address", what))
}

/// Deadline `minutes` from now, defaulting to the configured timeout
pub fn deadline(config: &Config, minutes: Option<i64>) -> Result<Deadline> {
    let minutes = minutes.unwrap_or(config.settings.trade.deadline_minutes);
    Ok(Deadline::minutes_from(Utc::now(), minutes)?)
}

/// Pretty print an address as shortened form
pub fn format_address(address: &Address) -> String {
    let s = address.as_str();
    format!("{}...{}", &s[0..8], &s[s.len() - 6..]).bright_yellow().to_string()
}

pub fn print_handles(handles: &ContractHandles) {
    println!("{} {}", "CFMM:".bright_cyan(), format_address(handles.cfmm()));
    println!("{} {}", "Cash:".bright_cyan(), format_address(handles.cash()));
    println!(
        "{} {} (id {})",
        "Token:".bright_cyan(),
        format_address(handles.token()),
        handles.token_id()
    );
    println!("{} {}", "LQT:".bright_cyan(), format_address(handles.lqt()));
}

fn describe(op: &OperationDescriptor) -> String {
    match op {
        OperationDescriptor::SetAllowance { contract, amount, .. } => {
            format!("approve {} on {}", amount, format_address(contract))
        }
        OperationDescriptor::SetOperator { contract, action, .. } => {
            format!("{} on {}", action.key(), format_address(contract))
        }
        OperationDescriptor::InvokeSwap { contract, entrypoint, .. }
        | OperationDescriptor::InvokeLiquidity { contract, entrypoint, .. } => {
            format!("{} on {}", entrypoint.as_str(), format_address(contract))
        }
    }
}

/// Print the batch, or its transfer params as JSON for the submitter
pub fn print_batch(batch: &Batch, json: bool) -> Result<()> {
    if json {
        let params = serde_json::to_string_pretty(&batch.transfer_params())?;
        println!("{}", params);
        return Ok(());
    }

    println!("\n{} ({} operations)", "Batch:".bright_cyan(), batch.len());
    for (i, op) in batch.iter().enumerate() {
        let line = describe(op);
        if op.is_revocation() {
            println!("  {}. {}", i + 1, line.dimmed());
        } else {
            println!("  {}. {}", i + 1, line);
        }
    }
    Ok(())
}

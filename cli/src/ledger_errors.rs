//! CFMM contract failure codes
//!
//! A rejected operation reports `[.., { "with": { "int": "<code>" } }]`;
//! the code indexes the table below. Codes 6, 23, 26 and 27 are unused.

use colored::Colorize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("payload has no `with.int` failure code")]
    MissingCode,
    #[error("failure code {0:?} is not a non-negative integer")]
    NotACode(String),
}

const MESSAGES: [(u32, &str); 31] = [
    (0, "Token contract must have a transfer entrypoint"),
    (1, "Assertion violated cash bought should be less than cash pool"),
    (2, "Pending pool updates must be zero"),
    (3, "The current time must be less than the deadline"),
    (4, "Max tokens deposited must be greater than or equal to tokens deposited"),
    (5, "LQT minted must be greater than min lqt minted"),
    (7, "Only new manager can accept"),
    (8, "Cash bought must be greater than or equal to min cash bought"),
    (9, "Invalid \"to\" address"),
    (10, "Amount must be zero"),
    (11, "The amount of cash withdrawn must be greater than or equal to min cash withdrawn"),
    (12, "LQT contract must have a mint or burn entrypoint"),
    (13, "The amount of tokens withdrawn must be greater than or equal to min tokens withdrawn"),
    (14, "Cannot burn more than the total amount of lqt"),
    (15, "Token pool minus tokens withdrawn is negative"),
    (16, "Cash pool minus Cash withdrawn is negative"),
    (17, "Cash pool minus Cash bought is negative"),
    (18, "Tokens bought must be greater than or equal to min tokens bought"),
    (19, "Token pool minus tokens bought is negative"),
    (20, "Only manager can set baker"),
    (21, "Only manager can set manager"),
    (22, "Baker permanently frozen"),
    (24, "Lqt address already set"),
    (25, "Call not from an implicit account"),
    (28, "Invalid fa2 token contract missing balance_of"),
    (29, "This entrypoint may only be called by getbalance of tokenaddress"),
    (30, "This entrypoint may only be called by getbalance of cash address"),
    (31, "Invalid intermediate contract"),
    (32, "tez deposit would be burned"),
    (33, "Invalid fa12 cash contract missing getbalance"),
    (34, "Missing approve entrypoint in cash contract"),
];

/// Message for a failure code
pub fn message(code: u32) -> Option<&'static str> {
    MESSAGES.iter().find(|(c, _)| *c == code).map(|(_, msg)| *msg)
}

/// Failure code from a ledger error payload.
///
/// The code may be encoded as a string (`"18"`) or a number (`18`).
pub fn extract_code(payload: &Value) -> Result<u32, PayloadError> {
    let int = payload
        .get(1)
        .and_then(|entry| entry.get("with"))
        .and_then(|with| with.get("int"))
        .ok_or(PayloadError::MissingCode)?;

    match int {
        Value::String(s) => s.trim().parse().map_err(|_| PayloadError::NotACode(s.clone())),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| PayloadError::NotACode(n.to_string())),
        other => Err(PayloadError::NotACode(other.to_string())),
    }
}

/// Explain a code given directly or as a JSON payload
pub fn explain_error(input: &str) -> anyhow::Result<()> {
    let code = match input.trim().parse::<u32>() {
        Ok(code) => code,
        Err(_) => {
            let payload: Value = serde_json::from_str(input)
                .map_err(|e| anyhow::anyhow!("Not a failure code or JSON payload: {}", e))?;
            extract_code(&payload)?
        }
    };

    println!("{}", "=== Contract Error ===".bright_green().bold());
    println!("{} {}", "Code:".bright_cyan(), code);
    match message(code) {
        Some(msg) => println!("{} {}", "Message:".bright_cyan(), msg),
        None => println!("{}", "Unknown failure code; the transaction failed".yellow()),
    }
    Ok(())
}

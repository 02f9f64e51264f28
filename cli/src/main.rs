//! CFMM CLI - Quote swaps and assemble operation batches
//!
//! Reads a CFMM storage snapshot, prices trades on the 8th-power curve and
//! prints the ordered batch of contract calls that executes them. Signing and
//! submission are left to the wallet.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod client;
mod config;
mod ledger_errors;
mod liquidity;
mod trading;

use cfmm_model::Direction;
use config::Config;
use liquidity::{AddLiquidityRequest, RemoveLiquidityRequest};
use trading::SwapRequest;

#[derive(Parser)]
#[command(name = "cfmm")]
#[command(about = "CFMM client - quote trades and build allowance-safe batches", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    /// Sell cash, buy tokens
    CashToToken,
    /// Sell tokens, buy cash
    TokenToCash,
}

impl From<Side> for Direction {
    fn from(side: Side) -> Self {
        match side {
            Side::CashToToken => Direction::CashToToken,
            Side::TokenToCash => Direction::TokenToCash,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the output of a swap
    Quote {
        /// CFMM storage snapshot (JSON)
        #[arg(short, long)]
        storage: PathBuf,

        /// Trade direction
        #[arg(value_enum)]
        side: Side,

        /// Amount sold, in decimal units (e.g. 12.5)
        amount: String,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u32>,
    },

    /// Show pool statistics
    Stats {
        /// CFMM storage snapshot (JSON)
        #[arg(short, long)]
        storage: PathBuf,

        /// Your LQT balance, to show your share of the pool
        #[arg(long)]
        lqt: Option<u64>,
    },

    /// Build a swap batch
    Swap {
        /// CFMM storage snapshot (JSON)
        #[arg(short, long)]
        storage: PathBuf,

        /// CFMM contract address
        #[arg(long)]
        cfmm: Option<String>,

        /// Trade direction
        #[arg(value_enum)]
        side: Side,

        /// Amount sold, in decimal units
        amount: String,

        /// Address selling the input asset
        #[arg(long)]
        owner: String,

        /// Address receiving the output (defaults to owner)
        #[arg(long)]
        to: Option<String>,

        /// Current cash allowance for the CFMM, raw ledger units
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        allowance: i128,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u32>,

        /// Minutes until the trade expires
        #[arg(long)]
        deadline_minutes: Option<i64>,

        /// Print transfer params as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an addLiquidity batch
    AddLiquidity {
        /// CFMM storage snapshot (JSON)
        #[arg(short, long)]
        storage: PathBuf,

        /// CFMM contract address
        #[arg(long)]
        cfmm: Option<String>,

        /// Liquidity provider address
        #[arg(long)]
        owner: String,

        /// Cash deposited, in decimal units
        #[arg(long)]
        cash: String,

        /// Maximum tokens deposited, in decimal units
        #[arg(long)]
        max_tokens: String,

        /// Minimum LQT minted
        #[arg(long, default_value = "0")]
        min_lqt: u64,

        /// Current cash allowance for the CFMM, raw ledger units
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        allowance: i128,

        /// Minutes until the deposit expires
        #[arg(long)]
        deadline_minutes: Option<i64>,

        /// Print transfer params as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a removeLiquidity batch
    RemoveLiquidity {
        /// CFMM storage snapshot (JSON)
        #[arg(short, long)]
        storage: PathBuf,

        /// CFMM contract address
        #[arg(long)]
        cfmm: Option<String>,

        /// LQT holder address
        #[arg(long)]
        owner: String,

        /// Address receiving the withdrawal (defaults to owner)
        #[arg(long)]
        to: Option<String>,

        /// LQT burned
        #[arg(long)]
        lqt: u64,

        /// Minimum cash withdrawn, in decimal units
        #[arg(long, default_value = "0")]
        min_cash: String,

        /// Minimum tokens withdrawn, in decimal units
        #[arg(long, default_value = "0")]
        min_tokens: String,

        /// Current LQT allowance for the CFMM
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        allowance: i128,

        /// Minutes until the withdrawal expires
        #[arg(long)]
        deadline_minutes: Option<i64>,

        /// Print transfer params as JSON
        #[arg(long)]
        json: bool,
    },

    /// Explain a contract failure code or error payload
    ExplainError {
        /// Numeric code, or the JSON error payload
        input: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = Config::load(cli.config)?;
    log::debug!("settings from {}", config.settings_path.display());

    match cli.command {
        Commands::Quote {
            storage,
            side,
            amount,
            slippage_bps,
        } => trading::quote(&config, &storage, side.into(), &amount, slippage_bps),
        Commands::Stats { storage, lqt } => liquidity::show_stats(&storage, lqt),
        Commands::Swap {
            storage,
            cfmm,
            side,
            amount,
            owner,
            to,
            allowance,
            slippage_bps,
            deadline_minutes,
            json,
        } => trading::swap(
            &config,
            SwapRequest {
                storage: &storage,
                cfmm: cfmm.as_deref(),
                direction: side.into(),
                amount: &amount,
                owner: &owner,
                recipient: to.as_deref(),
                allowance,
                slippage_bps,
                deadline_minutes,
                json,
            },
        ),
        Commands::AddLiquidity {
            storage,
            cfmm,
            owner,
            cash,
            max_tokens,
            min_lqt,
            allowance,
            deadline_minutes,
            json,
        } => liquidity::add_liquidity(
            &config,
            AddLiquidityRequest {
                storage: &storage,
                cfmm: cfmm.as_deref(),
                owner: &owner,
                cash_deposited: &cash,
                max_tokens_deposited: &max_tokens,
                min_lqt_minted: min_lqt,
                allowance,
                deadline_minutes,
                json,
            },
        ),
        Commands::RemoveLiquidity {
            storage,
            cfmm,
            owner,
            to,
            lqt,
            min_cash,
            min_tokens,
            allowance,
            deadline_minutes,
            json,
        } => liquidity::remove_liquidity(
            &config,
            RemoveLiquidityRequest {
                storage: &storage,
                cfmm: cfmm.as_deref(),
                owner: &owner,
                to: to.as_deref(),
                lqt_burned: lqt,
                min_cash_withdrawn: &min_cash,
                min_tokens_withdrawn: &min_tokens,
                allowance,
                deadline_minutes,
                json,
            },
        ),
        Commands::ExplainError { input } => ledger_errors::explain_error(&input),
    }
}

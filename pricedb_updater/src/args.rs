//! Command-line arguments for the price updater.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::Parser;

/// Chart endpoint queried when `--endpoint` is not given.
pub const DEFAULT_ENDPOINT: &str = "https://ycharts.com/charts/fund_data.json";

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Price ledger to update.
    #[arg(long, env = "WEALTH_PULSE_PRICES_FILE")]
    pub prices_file: PathBuf,

    /// Text file with one `SYMBOL CODE` pair per line.
    /// The built-in fund table is used when omitted.
    #[arg(long)]
    pub symbols: Option<PathBuf>,

    /// Unit marker written in front of fetched prices.
    #[arg(long, default_value = "$")]
    pub currency: String,

    /// Chart data endpoint.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// HTTP timeout per symbol, in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Fetch and merge, but leave the ledger untouched.
    #[arg(long)]
    pub dry_run: bool,
}

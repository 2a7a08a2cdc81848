//! Price Updater — refreshes a price ledger with the latest fund prices.
//!
//! It reads the ledger named by `--prices-file` (or `WEALTH_PULSE_PRICES_FILE`), fetches
//! the chart history of every configured symbol, appends prices newer than the latest
//! ledger entry per symbol and rewrites the ledger sorted by symbol and date.
//!
//! Usage example (CLI):
//! ```bash
//! pricedb_updater --prices-file ~/ledger/prices.txt --symbols ./funds.txt
//! ```
//!
//! The symbols file holds one `SYMBOL CODE` pair per line; see
//! `pricedb_common::symbols` for details.
#![warn(missing_docs)]
mod args;
mod client;
mod model;

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use pricedb_common::symbols::SymbolMap;
use pricedb_common::update::update_price_db;
use pricedb_common::{PriceDbError, Result};

use crate::args::Args;
use crate::client::ChartClient;

fn main() -> Result<(), PriceDbError> {
    init_logger();
    let args = Args::parse();

    run(&args).inspect_err(|e| error!("Update failed: {}", e))
}

fn run(args: &Args) -> Result<()> {
    let symbols = load_symbols(args)?;
    info!("Symbols: {:?}", symbols.iter().map(|(s, _)| s).collect::<Vec<_>>());

    let client = ChartClient::new(
        &args.endpoint,
        &args.currency,
        Duration::from_secs(args.timeout_secs),
    )?;

    let summary = update_price_db(&args.prices_file, &client, &symbols, args.dry_run)?;
    info!(
        "Done: {} existing, {} added, {} symbols skipped",
        summary.existing, summary.added, summary.skipped
    );
    Ok(())
}

fn load_symbols(args: &Args) -> Result<SymbolMap> {
    match &args.symbols {
        Some(path) => {
            let file = File::open(path)?;
            SymbolMap::parse_from_file(BufReader::new(file))
        }
        None => Ok(SymbolMap::builtin()),
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

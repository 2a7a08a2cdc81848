//! One full update cycle: read, parse, fetch, merge, write.
//!
//! Fetching goes through the [`PriceSource`] trait so the cycle does not depend on a
//! particular chart provider. Symbols are fetched one after another in table order.
use std::path::Path;

use log::{error, info, warn};

use crate::merge::merge;
use crate::parser::read_price_db;
use crate::price::PriceRecord;
use crate::result::Result;
use crate::symbols::SymbolMap;
use crate::writer::write_price_db;

/// Supplies freshly observed prices for one symbol.
pub trait PriceSource {
    /// Returns the prices for `symbol` in chronological order. `code` is the
    /// provider-specific identifier from the symbol table.
    fn fetch(&self, symbol: &str, code: &str) -> Result<Vec<PriceRecord>>;
}

/// What an update cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Records in the ledger before the update.
    pub existing: usize,
    /// Symbols that could not be fetched.
    pub skipped: usize,
    /// Records accepted by the merge.
    pub added: usize,
    /// Whether the ledger file was rewritten.
    pub written: bool,
}

/// Fetches every symbol in `symbols`, skipping symbols whose fetch fails recoverably.
pub fn fetch_all<P: PriceSource + ?Sized>(
    source: &P,
    symbols: &SymbolMap,
) -> Result<(Vec<(String, Vec<PriceRecord>)>, usize)> {
    let mut retrieved = Vec::with_capacity(symbols.len());
    let mut skipped = 0;

    for (symbol, code) in symbols.iter() {
        info!("Retrieving prices for symbol: {}", symbol);
        match source.fetch(symbol, code) {
            Ok(prices) => {
                if let (Some(first), Some(last)) = (prices.first(), prices.last()) {
                    info!("First price received: {}", first);
                    info!("Last price received: {}", last);
                }
                retrieved.push((symbol.to_string(), prices));
            }
            Err(e) if e.is_recoverable() => {
                error!("Error getting prices for {}: {}", symbol, e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((retrieved, skipped))
}

/// Runs a full update of the ledger at `path`.
///
/// Read and parse failures abort before anything is fetched. The file is only rewritten
/// when at least one new record was accepted and `dry_run` is off.
pub fn update_price_db<P: PriceSource + ?Sized>(
    path: &Path,
    source: &P,
    symbols: &SymbolMap,
    dry_run: bool,
) -> Result<UpdateSummary> {
    let existing = read_price_db(path)?;
    let existing_count = existing.len();

    let (retrieved, skipped) = fetch_all(source, symbols)?;
    let outcome = merge(existing, retrieved);

    let mut summary = UpdateSummary {
        existing: existing_count,
        skipped,
        added: outcome.added,
        written: false,
    };

    if !outcome.changed() {
        info!("No new prices found");
        return Ok(summary);
    }

    if dry_run {
        warn!(
            "Dry run: {} new prices not written to {}",
            outcome.added,
            path.display()
        );
        return Ok(summary);
    }

    write_price_db(path, &outcome.prices)?;
    summary.written = true;
    Ok(summary)
}

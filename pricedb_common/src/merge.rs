//! Merging freshly retrieved prices into an existing price set.
//!
//! For each refreshed symbol the latest existing date is the floor; only retrieved
//! records strictly after the floor are added. Records sharing a `(symbol, date)` pair
//! are never collapsed: duplicates already in the ledger, or among the retrieved records
//! themselves, are all kept and stay in insertion order after the final sort.
use chrono::NaiveDate;
use log::{debug, info};

use crate::price::{PriceRecord, PriceSet};

/// Result of a merge: the combined, sorted set and how many records were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Existing plus accepted records, sorted by symbol then date.
    pub prices: PriceSet,
    /// Number of retrieved records that passed the date filter.
    pub added: usize,
}

impl MergeOutcome {
    /// `false` when nothing new was accepted and the ledger need not be rewritten.
    pub fn changed(&self) -> bool {
        self.added > 0
    }
}

/// Appends every record of `retrieved` dated strictly after the floor of `symbol`.
///
/// The floor is taken from `prices` before anything is appended. Returns the number of
/// records added. The set is left unsorted.
pub fn merge_symbol<I>(prices: &mut PriceSet, symbol: &str, retrieved: I) -> usize
where
    I: IntoIterator<Item = PriceRecord>,
{
    let floor: Option<NaiveDate> = prices.latest_for(symbol).map(|latest| latest.date);
    debug!("floor for {}: {:?}", symbol, floor);

    let mut added = 0;
    for record in retrieved {
        if floor.is_none_or(|floor| record.date > floor) {
            info!("Adding price: {}", record);
            prices.push(record);
            added += 1;
        }
    }
    added
}

/// Merges retrieved prices per symbol into `existing` and sorts the result.
pub fn merge<S, I>(existing: PriceSet, retrieved: impl IntoIterator<Item = (S, I)>) -> MergeOutcome
where
    S: AsRef<str>,
    I: IntoIterator<Item = PriceRecord>,
{
    let mut prices = existing;
    let mut added = 0;
    for (symbol, records) in retrieved {
        added += merge_symbol(&mut prices, symbol.as_ref(), records);
    }
    prices.sort();
    MergeOutcome { prices, added }
}

//! Price ledger data model.
//!
//! A `PriceRecord` is one dated quote: `P 2022-02-20 "WP" $25.0000`. Quantities are
//! kept as the literal text read from the ledger so that a parse/render cycle never
//! changes their formatting.
use std::fmt;

use chrono::NaiveDate;

/// Record sentinel that starts every ledger line.
pub const SENTINEL: char = 'P';
/// Line terminator written after every record.
pub const LINE_END: &str = "\r\n";
/// Date layout used by the ledger grammar.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A unit marker followed by a verbatim decimal quantity, e.g. `$25.37`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount {
    /// Currency or unit marker (e.g. `$`).
    pub unit: String,
    /// Decimal text exactly as written.
    pub quantity: String,
}

impl Amount {
    /// Creates a new amount from a unit marker and quantity text.
    pub fn new(unit: impl Into<String>, quantity: impl Into<String>) -> Self {
        Amount {
            unit: unit.into(),
            quantity: quantity.into(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.unit, self.quantity)
    }
}

/// One dated quote for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceRecord {
    /// Calendar date of the quote (UTC midnight).
    pub date: NaiveDate,
    /// Quoted instrument, never contains `"`.
    pub symbol: String,
    /// Price of one unit of `symbol`.
    pub amount: Amount,
}

impl PriceRecord {
    /// Creates a new record.
    pub fn new(date: NaiveDate, symbol: impl Into<String>, amount: Amount) -> Self {
        PriceRecord {
            date,
            symbol: symbol.into(),
            amount,
        }
    }
}

impl fmt::Display for PriceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\" {}",
            SENTINEL,
            self.date.format(DATE_FORMAT),
            self.symbol,
            self.amount
        )
    }
}

/// Ordered collection of price records.
///
/// Duplicate `(symbol, date)` pairs are allowed and preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSet {
    records: Vec<PriceRecord>,
}

impl PriceSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the end.
    pub fn push(&mut self, record: PriceRecord) {
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in set order.
    pub fn iter(&self) -> std::slice::Iter<'_, PriceRecord> {
        self.records.iter()
    }

    /// Records in set order.
    pub fn as_slice(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Latest record for `symbol`, i.e. the merge floor. `None` when the symbol is unknown.
    ///
    /// On equal dates the first record in set order wins.
    pub fn latest_for(&self, symbol: &str) -> Option<&PriceRecord> {
        let mut latest: Option<&PriceRecord> = None;
        for record in self.records.iter().filter(|r| r.symbol == symbol) {
            match latest {
                Some(current) if record.date <= current.date => {}
                _ => latest = Some(record),
            }
        }
        latest
    }

    /// Stable sort by symbol, then date.
    pub fn sort(&mut self) {
        self.records
            .sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.date.cmp(&b.date)));
    }
}

impl From<Vec<PriceRecord>> for PriceSet {
    fn from(records: Vec<PriceRecord>) -> Self {
        PriceSet { records }
    }
}

impl IntoIterator for PriceSet {
    type Item = PriceRecord;
    type IntoIter = std::vec::IntoIter<PriceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a PriceSet {
    type Item = &'a PriceRecord;
    type IntoIter = std::slice::Iter<'a, PriceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

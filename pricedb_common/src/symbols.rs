//! Symbol to chart-provider code table.
//!
//! The updater refreshes exactly the symbols listed here. A table can be loaded from a
//! text file with one `SYMBOL CODE` pair per line; blank lines and lines starting with
//! `#` are skipped.
use std::collections::BTreeMap;
use std::io::BufRead;

use crate::error::PriceDbError;
use crate::result::Result;

/// Symbols refreshed when no table file is configured.
const DEFAULT_SYMBOLS: [(&str, &str); 4] = [
    ("TDB900", "TDB900.TO"),
    ("TDB902", "TDB902.TO"),
    ("TDB909", "TDB909.TO"),
    ("TDB911", "TDB911.TO"),
];

/// Ordered mapping from ledger symbol to provider code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    codes: BTreeMap<String, String>,
}

impl SymbolMap {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table used when no table file is configured.
    pub fn builtin() -> Self {
        let mut map = SymbolMap::new();
        for (symbol, code) in DEFAULT_SYMBOLS {
            map.insert(symbol, code);
        }
        map
    }

    /// Adds or replaces the code for `symbol`.
    pub fn insert(&mut self, symbol: impl Into<String>, code: impl Into<String>) {
        self.codes.insert(symbol.into(), code.into());
    }

    /// Provider code for `symbol`.
    pub fn code(&self, symbol: &str) -> Option<&str> {
        self.codes.get(symbol).map(String::as_str)
    }

    /// Iterates `(symbol, code)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codes.iter().map(|(s, c)| (s.as_str(), c.as_str()))
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// `true` when no symbol is configured.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Parses a table from a buffered reader.
    ///
    /// Each remaining line must hold exactly two whitespace-separated fields. Symbols
    /// may not contain `"` since they are written inside quotes in the ledger.
    pub fn parse_from_file<R: BufRead>(reader: R) -> Result<Self> {
        let mut map = SymbolMap::new();

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(PriceDbError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed_line.split_whitespace().collect();
            match fields.as_slice() {
                [symbol, _] if symbol.contains('"') => {
                    return Err(PriceDbError::SymbolsFile(format!(
                        "line {}: symbol {} contains a quote",
                        idx + 1,
                        symbol
                    )));
                }
                [symbol, code] => map.insert(*symbol, *code),
                _ => {
                    return Err(PriceDbError::SymbolsFile(format!(
                        "line {}: expected 'SYMBOL CODE', got '{}'",
                        idx + 1,
                        trimmed_line
                    )));
                }
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn builtin_table() {
        assert!(SymbolMap::new().is_empty());
        let map = SymbolMap::builtin();
        assert_eq!(map.len(), 4);
        assert_eq!(map.code("TDB902"), Some("TDB902.TO"));
    }

    #[test]
    fn parses_pairs_and_skips_comments() -> Result<()> {
        let input = "# funds\nTDB911 TDB911.TO\n\n  WP\tM:WP01  \n";
        let map = SymbolMap::parse_from_file(Cursor::new(input))?;
        let pairs: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(pairs, vec![("TDB911", "TDB911.TO"), ("WP", "M:WP01")]);
        Ok(())
    }

    #[test]
    fn rejects_malformed_line() {
        let err = SymbolMap::parse_from_file(Cursor::new("TDB900\n")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse symbols file error: line 1: expected 'SYMBOL CODE', got 'TDB900'"
        );
    }

    #[test]
    fn rejects_quoted_symbol() {
        let err = SymbolMap::parse_from_file(Cursor::new("\"WP\" WP.TO\n")).unwrap_err();
        assert!(matches!(err, PriceDbError::SymbolsFile(_)));
    }
}

//! Error types shared between the library and the updater binary.
//!
//! The `PriceDbError` enum covers the whole failure taxonomy of a run: I/O on the
//! ledger file, scanner and record-parser failures, and per-symbol fetch failures.
//! Only the fetch family is recoverable; everything else aborts the run.
use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Unified error type for reading, parsing, fetching and writing price ledgers.
#[derive(Error, Debug)]
pub enum PriceDbError {
    /// Ledger could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The scanner met a malformed field. `offset` is the byte position in the input.
    #[error("Lex error at byte {offset}: {message}")]
    Lex {
        /// Byte offset where scanning stopped.
        offset: usize,
        /// Human-readable diagnostic emitted by the scanner.
        message: String,
    },

    /// A year, month or day field is not a base-10 integer.
    #[error("Invalid {field} field '{value}': {source}")]
    DateField {
        /// Which date field failed (`year`, `month`, `day`).
        field: &'static str,
        /// Raw field text.
        value: String,
        /// Underlying integer parse failure.
        source: ParseIntError,
    },

    /// Numeric date fields that do not name a calendar day.
    #[error("Invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Parsed year.
        year: i32,
        /// Parsed month.
        month: u32,
        /// Parsed day of month.
        day: u32,
    },

    /// A record was interrupted by a token of the wrong kind.
    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// Token kind the parser needed.
        expected: String,
        /// Description of what was actually scanned.
        found: String,
    },

    /// Transport, status or decode failure while fetching one symbol.
    #[error("Fetch failed for {symbol}: {message}")]
    Fetch {
        /// Symbol being refreshed.
        symbol: String,
        /// Failure description.
        message: String,
    },

    /// The chart service answered but carried no chart data.
    #[error("Unexpected response for {symbol}: chart data not found")]
    EmptyResponse {
        /// Symbol being refreshed.
        symbol: String,
    },

    /// A chart data point could not be turned into a price record.
    #[error("Invalid quote for {symbol}: {message}")]
    InvalidQuote {
        /// Symbol being refreshed.
        symbol: String,
        /// Failure description.
        message: String,
    },

    /// Error while parsing the symbol table file.
    #[error("Parse symbols file error: {0}")]
    SymbolsFile(String),

    /// Failure while decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The HTTP client could not be set up.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The temporary ledger file could not be moved over the target.
    #[error("Persist error: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl PriceDbError {
    /// `true` for failures that only affect a single symbol's fetch.
    ///
    /// The updater skips the symbol and keeps going; every other error aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PriceDbError::Fetch { .. }
                | PriceDbError::EmptyResponse { .. }
                | PriceDbError::InvalidQuote { .. }
                | PriceDbError::SerdeJson(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_family_is_recoverable() {
        let empty = PriceDbError::EmptyResponse {
            symbol: "TDB900".to_string(),
        };
        assert!(empty.is_recoverable());
        assert_eq!(
            empty.to_string(),
            "Unexpected response for TDB900: chart data not found"
        );

        let lex = PriceDbError::Lex {
            offset: 3,
            message: "unterminated quoted symbol".to_string(),
        };
        assert!(!lex.is_recoverable());
    }

    #[test]
    fn client_setup_failure_is_fatal() {
        let err = PriceDbError::HttpClient("no TLS backend".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "HTTP client error: no TLS backend");
    }

    #[test]
    fn invalid_date_message_is_zero_padded() {
        let err = PriceDbError::InvalidDate {
            year: 2022,
            month: 2,
            day: 30,
        };
        assert_eq!(err.to_string(), "Invalid date 2022-02-30");
    }
}

//!
//! Price ledger parsing, merging and rewriting.
//!
//! A price ledger is a text file of dated quotes, one per line:
//! `P 2022-02-20 "WP" $25.0000`. This crate aggregates:
//! - `lexer` — pull-based scanner turning ledger text into tokens.
//! - `parser` — record parser building a `PriceSet` from the token stream.
//! - `price` — `Amount`, `PriceRecord` and `PriceSet`.
//! - `merge` — per-symbol floor filtering of freshly fetched prices.
//! - `writer` — exact-format rendering and atomic replacement of the ledger file.
//! - `symbols` — symbol to provider-code table.
//! - `update` — the read/fetch/merge/write cycle over a `PriceSource`.
//! - `error`, `result` — the shared `PriceDbError` and `Result` alias.
#![warn(missing_docs)]
pub mod error;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod price;
pub mod result;
pub mod symbols;
pub mod update;
pub mod writer;

pub use error::PriceDbError;
pub use parser::{parse_price, parse_price_db};
pub use price::{Amount, PriceRecord, PriceSet};
pub use result::Result;
pub use update::PriceSource;

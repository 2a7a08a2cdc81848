//! Record parser: drives the [`Scanner`] and assembles [`PriceRecord`]s.
//!
//! Parsing is all-or-nothing. Any scanner error, out-of-order token or bad date field
//! fails the whole call and no records are returned.
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info};

use crate::error::PriceDbError;
use crate::lexer::{Scanner, Token, TokenKind};
use crate::price::{Amount, PriceRecord, PriceSet};
use crate::result::Result;

/// Reads and parses the ledger at `path`.
pub fn read_price_db(path: &Path) -> Result<PriceSet> {
    info!("Reading prices from {}", path.display());
    let content = fs::read_to_string(path)?;
    let prices = parse_price_db(&content)?;
    info!("Read {} prices", prices.len());
    Ok(prices)
}

/// Parses a whole ledger. Empty input yields an empty set.
pub fn parse_price_db(input: &str) -> Result<PriceSet> {
    let mut scanner = Scanner::new(input);
    let mut prices = PriceSet::new();

    while let Some(token) = scanner.next_token() {
        match token.kind {
            TokenKind::Sentinel => prices.push(parse_record(&mut scanner)?),
            TokenKind::Error => return Err(lex_error(token)),
            _ => break,
        }
    }

    debug!("parsed {} price records", prices.len());
    Ok(prices)
}

/// Parses text holding exactly one record, with or without a trailing line terminator.
pub fn parse_price(input: &str) -> Result<PriceRecord> {
    let mut scanner = Scanner::new(input);
    expect(&mut scanner, TokenKind::Sentinel)?;
    let record = parse_record(&mut scanner)?;
    expect(&mut scanner, TokenKind::EndOfInput)?;
    Ok(record)
}

/// Parses the fields that follow a sentinel.
fn parse_record(scanner: &mut Scanner<'_>) -> Result<PriceRecord> {
    let year = expect(scanner, TokenKind::Year)?;
    let month = expect(scanner, TokenKind::Month)?;
    let day = expect(scanner, TokenKind::DayOfMonth)?;
    let symbol = expect(scanner, TokenKind::QuotedSymbol)?;
    let unit = expect(scanner, TokenKind::Unit)?;
    let quantity = expect(scanner, TokenKind::Quantity)?;

    let year: i32 = date_field("year", &year)?;
    let month: u32 = date_field("month", &month)?;
    let day: u32 = date_field("day", &day)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(PriceDbError::InvalidDate { year, month, day })?;

    Ok(PriceRecord::new(
        date,
        symbol.value,
        Amount::new(unit.value, quantity.value),
    ))
}

/// Pulls the next token and checks its kind.
fn expect<'a>(scanner: &mut Scanner<'a>, kind: TokenKind) -> Result<Token<'a>> {
    match scanner.next_token() {
        Some(token) if token.kind == kind => Ok(token),
        Some(token) if token.is_error() => Err(lex_error(token)),
        Some(token) => Err(PriceDbError::UnexpectedToken {
            expected: kind.to_string(),
            found: token.to_string(),
        }),
        None => Err(PriceDbError::UnexpectedToken {
            expected: kind.to_string(),
            found: "nothing".to_string(),
        }),
    }
}

fn date_field<T>(field: &'static str, token: &Token<'_>) -> Result<T>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    token
        .value
        .parse::<T>()
        .map_err(|source| PriceDbError::DateField {
            field,
            value: token.value.to_string(),
            source,
        })
}

fn lex_error(token: Token<'_>) -> PriceDbError {
    PriceDbError::Lex {
        offset: token.offset,
        message: token.value.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_db_has_no_prices() -> Result<()> {
        let prices = parse_price_db("")?;
        assert!(prices.is_empty());
        Ok(())
    }

    #[test]
    fn parses_all_records() -> Result<()> {
        let prices =
            parse_price_db("P 2022-02-20 \"WP\" $25.0000\r\nP 2022-02-21 \"WP\" $25.4400\r\n")?;
        assert_eq!(
            prices.as_slice(),
            &[
                PriceRecord::new(date(2022, 2, 20), "WP", Amount::new("$", "25.0000")),
                PriceRecord::new(date(2022, 2, 21), "WP", Amount::new("$", "25.4400")),
            ]
        );
        Ok(())
    }

    #[test]
    fn parses_single_price() -> Result<()> {
        let price = parse_price("P 2021-08-28 \"WP\" $25.4400")?;
        assert_eq!(
            price,
            PriceRecord::new(date(2021, 8, 28), "WP", Amount::new("$", "25.4400"))
        );
        Ok(())
    }

    #[test]
    fn single_price_rejects_trailing_records() {
        let err = parse_price("P 2021-08-28 \"WP\" $25.44\nP 2021-08-29 \"WP\" $25.45").unwrap_err();
        assert!(matches!(err, PriceDbError::UnexpectedToken { .. }));
        assert_eq!(
            err.to_string(),
            "Unexpected token: expected end of input, found sentinel \"P\""
        );
    }

    #[test]
    fn bad_year_fails_whole_parse() {
        let err = parse_price_db("P 2022-02-20 \"WP\" $25.00\r\nP 20x2-02-21 \"WP\" $25.44\r\n")
            .unwrap_err();
        match err {
            PriceDbError::DateField { field, value, .. } => {
                assert_eq!(field, "year");
                assert_eq!(value, "20x2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn impossible_date_is_rejected() {
        let err = parse_price_db("P 2022-02-30 \"WP\" $25.00\r\n").unwrap_err();
        assert!(matches!(
            err,
            PriceDbError::InvalidDate {
                year: 2022,
                month: 2,
                day: 30
            }
        ));
    }

    #[test]
    fn lex_error_fails_whole_parse() {
        let err = parse_price_db("P 2022-02-20 \"WP\" $25.00\r\nP 2022-02-21 \"WP $1\r\n")
            .unwrap_err();
        match err {
            PriceDbError::Lex { message, .. } => assert_eq!(message, "unterminated quoted symbol"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn trailing_garbage_is_a_lex_error() {
        let err = parse_price_db("P 2022-02-20 \"WP\" $25.00\r\n\r\n# note\r\n").unwrap_err();
        assert!(matches!(err, PriceDbError::Lex { .. }));
    }
}

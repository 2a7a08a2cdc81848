//! Fund chart payload returned by the chart service.
//!
//! The body looks like `{"chart_data": [[{"raw_data": [[1645315200000, 25.37], ...]}]]}`.
//! Each raw point is a UTC timestamp in milliseconds followed by the price. Prices are
//! converted from the JSON number text through `Decimal`, so no binary float rounding
//! happens before they are formatted with two decimal places.
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use pricedb_common::{Amount, PriceDbError, PriceRecord, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use serde_json::Number;

/// Decimal places of fetched quantities.
const QUANTITY_SCALE: u32 = 2;

/// Top-level chart response.
#[derive(Debug, Clone, Deserialize)]
pub struct FundDataResponse {
    /// Chart series groups; prices are in the first series of the first group.
    pub chart_data: Vec<Vec<ChartData>>,
}

/// One chart series.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartData {
    /// `[timestamp_ms, price]` points in chronological order.
    pub raw_data: Vec<Vec<Number>>,
}

impl FundDataResponse {
    /// Converts the first series into price records for `symbol`, priced in `unit`.
    pub fn into_prices(self, symbol: &str, unit: &str) -> Result<Vec<PriceRecord>> {
        let series = self
            .chart_data
            .into_iter()
            .next()
            .and_then(|group| group.into_iter().next())
            .filter(|series| !series.raw_data.is_empty())
            .ok_or_else(|| PriceDbError::EmptyResponse {
                symbol: symbol.to_string(),
            })?;

        series
            .raw_data
            .iter()
            .map(|point| to_price(symbol, unit, point))
            .collect()
    }
}

/// Converts one `[timestamp_ms, price]` point.
pub fn to_price(symbol: &str, unit: &str, point: &[Number]) -> Result<PriceRecord> {
    let [timestamp, price] = point else {
        return Err(invalid(
            symbol,
            format!("expected [timestamp, price], got {} values", point.len()),
        ));
    };

    let date = utc_date(symbol, timestamp)?;
    let quantity = format_quantity(symbol, price)?;
    Ok(PriceRecord::new(date, symbol, Amount::new(unit, quantity)))
}

fn utc_date(symbol: &str, timestamp: &Number) -> Result<NaiveDate> {
    let millis = timestamp
        .as_i64()
        .or_else(|| timestamp.as_f64().map(|ms| ms as i64))
        .ok_or_else(|| invalid(symbol, format!("bad timestamp {timestamp}")))?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| invalid(symbol, format!("timestamp {millis} out of range")))
}

/// Formats the price with exactly two decimals, rounding half away from zero.
fn format_quantity(symbol: &str, price: &Number) -> Result<String> {
    let text = price.to_string();
    let mut value = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| invalid(symbol, format!("bad price {text}: {e}")))?
        .round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(QUANTITY_SCALE);
    Ok(value.to_string())
}

fn invalid(symbol: &str, message: String) -> PriceDbError {
    PriceDbError::InvalidQuote {
        symbol: symbol.to_string(),
        message,
    }
}

//! HTTP client for the chart service.
//!
//! One blocking GET per symbol; the response body is decoded into a
//! [`FundDataResponse`] and converted into price records. Any failure here is reported
//! as a recoverable error so the caller can skip the symbol.
use std::time::Duration;

use log::debug;
use pricedb_common::{PriceDbError, PriceRecord, PriceSource, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Request};

use crate::model::chart::FundDataResponse;

/// Browser user agent; the chart service rejects unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.81 Safari/537.36";

/// Fetches fund price history from the chart service.
pub struct ChartClient {
    http: Client,
    endpoint: String,
    unit: String,
}

impl ChartClient {
    /// Build a client for `endpoint` that prices fetched quotes in `unit`.
    pub fn new(endpoint: &str, unit: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PriceDbError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            unit: unit.to_string(),
        })
    }

    /// Builds the chart request for a provider `code`.
    pub fn request(&self, code: &str) -> reqwest::Result<Request> {
        let securities = format!("id:M:{code},include:true,,");
        self.http
            .get(&self.endpoint)
            .query(&[
                ("securities", securities.as_str()),
                ("calcs", "id:price,include:true,,"),
                ("format", "real"),
                ("recessions", "false"),
                ("zoom", "5"),
            ])
            .build()
    }
}

impl PriceSource for ChartClient {
    fn fetch(&self, symbol: &str, code: &str) -> Result<Vec<PriceRecord>> {
        let request = self.request(code).map_err(|e| fetch_error(symbol, e))?;
        debug!("GET {}", request.url());

        let response = self
            .http
            .execute(request)
            .map_err(|e| fetch_error(symbol, e))?;
        let status = response.status();
        let body = response.text().map_err(|e| fetch_error(symbol, e))?;
        debug!("{} bytes of chart data for {}", body.len(), symbol);
        decode(symbol, &self.unit, status, &body)
    }
}

/// Turns a chart response into price records priced in `unit`.
fn decode(symbol: &str, unit: &str, status: StatusCode, body: &str) -> Result<Vec<PriceRecord>> {
    if !status.is_success() {
        return Err(PriceDbError::Fetch {
            symbol: symbol.to_string(),
            message: format!("HTTP status {status}"),
        });
    }
    let data: FundDataResponse = serde_json::from_str(body)?;
    data.into_prices(symbol, unit)
}

fn fetch_error(symbol: &str, err: reqwest::Error) -> PriceDbError {
    PriceDbError::Fetch {
        symbol: symbol.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_embeds_code_in_securities() -> Result<()> {
        let client = ChartClient::new(
            "https://charts.example.com/fund_data.json",
            "$",
            Duration::from_secs(5),
        )?;
        let request = client.request("TDB900.TO").unwrap();
        let url = request.url();

        assert_eq!(url.host_str(), Some("charts.example.com"));
        let securities = url
            .query_pairs()
            .find(|(k, _)| k == "securities")
            .map(|(_, v)| v.into_owned());
        assert_eq!(securities.as_deref(), Some("id:M:TDB900.TO,include:true,,"));
        Ok(())
    }

    #[test]
    fn error_status_is_a_fetch_failure() {
        let err = decode("TDB900", "$", StatusCode::NOT_FOUND, "not here").unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Fetch failed for TDB900: HTTP status 404 Not Found"
        );
    }

    #[test]
    fn malformed_body_is_recoverable() {
        let err = decode("TDB902", "$", StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, PriceDbError::SerdeJson(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn successful_response_yields_prices() -> Result<()> {
        let body = r#"{"chart_data":[[{"raw_data":[[1645315200000,25.37]]}]]}"#;
        let prices = decode("TDB909", "$", StatusCode::OK, body)?;
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].to_string(), "P 2022-02-20 \"TDB909\" $25.37");
        Ok(())
    }
}

//! Yahoo Finance price source.
//!
//! Uses the public chart endpoint and takes the latest daily close.

use chrono::{DateTime, NaiveDate};
use fifoledger_core::LedgerError;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use ureq::Agent;

use crate::{PriceSource, Quote};

/// Default time allowed for one quote request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; fifoledger/1.0)";

/// Yahoo Finance price source.
pub struct YahooFinance {
    agent: Agent,
    user_agent: String,
    base_url: String,
}

impl YahooFinance {
    /// Create a source with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a source whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: Agent::new_with_config(config),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the Yahoo Finance API URL.
    fn build_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?interval=1d&range=5d",
            self.base_url,
            urlencoding::encode(symbol)
        )
    }
}

impl Default for YahooFinance {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for YahooFinance {
    fn fetch_price(&self, symbol: &str) -> Result<Quote, LedgerError> {
        let url = self.build_url(symbol);
        tracing::debug!(symbol, %url, "fetching quote");

        let mut response = self
            .agent
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| LedgerError::upstream(symbol, format!("request failed: {e}")))?;

        let json: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| LedgerError::upstream(symbol, format!("unreadable response: {e}")))?;

        parse_chart(symbol, &json)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

/// Extract the latest close from a chart response.
///
/// The newest non-null daily close wins; `regularMarketPrice` is the
/// fallback when the close series is empty.
pub fn parse_chart(symbol: &str, json: &Value) -> Result<Quote, LedgerError> {
    let result = json
        .get("chart")
        .and_then(|c| c.get("result"))
        .and_then(|r| r.get(0))
        .ok_or_else(|| {
            let reason = json
                .pointer("/chart/error/description")
                .and_then(Value::as_str)
                .unwrap_or("no chart data");
            LedgerError::upstream(symbol, reason)
        })?;

    let closes = result
        .pointer("/indicators/quote/0/close")
        .and_then(Value::as_array);
    let timestamps = result.get("timestamp").and_then(Value::as_array);

    let latest_close = closes.and_then(|closes| {
        closes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, close)| close.as_f64().map(|c| (i, c)))
    });

    let (price, as_of) = match latest_close {
        Some((i, close)) => {
            let day = timestamps
                .and_then(|ts| ts.get(i))
                .and_then(Value::as_i64)
                .and_then(trading_day);
            (close, day)
        }
        None => {
            let price = result
                .pointer("/meta/regularMarketPrice")
                .and_then(Value::as_f64)
                .ok_or_else(|| LedgerError::upstream(symbol, "no closing price"))?;
            (price, None)
        }
    };

    let price = Decimal::from_str(&format!("{price:.4}"))
        .map_err(|_| LedgerError::upstream(symbol, format!("unusable price {price}")))?;
    if price < Decimal::ZERO {
        return Err(LedgerError::upstream(symbol, format!("negative price {price}")));
    }

    Ok(Quote {
        symbol: symbol.to_string(),
        price,
        as_of,
    })
}

fn trading_day(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

//! Market price sources for fifoledger
//!
//! The ledger only ever sees a resolved, non-negative price. This crate
//! decides where that number comes from:
//!
//! - a manual override supplied by the caller, or
//! - a live quote from a [`PriceSource`] such as [`YahooFinance`].
//!
//! A failed lookup is always an error
//! ([`LedgerError::UpstreamPriceUnavailable`]); it is never turned into a
//! price of zero.
//!
//! # Example
//!
//! ```
//! use fifoledger_price::{resolve_price, FixedPrice};
//! use rust_decimal_macros::dec;
//!
//! let source = FixedPrice::new().with_price("AAPL", dec!(170));
//!
//! // A manual price wins over the source
//! assert_eq!(resolve_price(Some(dec!(99)), Some("AAPL"), &source).unwrap(), dec!(99));
//! assert_eq!(resolve_price(None, Some("AAPL"), &source).unwrap(), dec!(170));
//! assert!(resolve_price(None, Some("MSFT"), &source).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod yahoo;

use chrono::NaiveDate;
use fifoledger_core::LedgerError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub use yahoo::YahooFinance;

/// A price observed for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Instrument symbol as requested.
    pub symbol: String,
    /// Price per unit.
    pub price: Decimal,
    /// Trading day the price belongs to, when the source reports one.
    pub as_of: Option<NaiveDate>,
}

/// Price source trait for different data providers.
pub trait PriceSource: Send + Sync {
    /// Fetch the latest price for a symbol.
    fn fetch_price(&self, symbol: &str) -> Result<Quote, LedgerError>;

    /// Source name.
    fn name(&self) -> &'static str;
}

/// A static table of prices.
///
/// Useful offline and in tests; unknown symbols are reported as unavailable.
#[derive(Debug, Clone, Default)]
pub struct FixedPrice {
    prices: HashMap<String, Decimal>,
}

impl FixedPrice {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a price.
    #[must_use]
    pub fn with_price(mut self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }
}

impl PriceSource for FixedPrice {
    fn fetch_price(&self, symbol: &str) -> Result<Quote, LedgerError> {
        self.prices
            .get(symbol)
            .map(|&price| Quote {
                symbol: symbol.to_string(),
                price,
                as_of: None,
            })
            .ok_or_else(|| LedgerError::upstream(symbol, "no price on record"))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Decide the market price for a valuation.
///
/// A manual price is used as given once checked to be non-negative.
/// Otherwise `symbol` is looked up in `source`; without a symbol there is
/// nothing to look up and the price is unavailable.
pub fn resolve_price(
    manual: Option<Decimal>,
    symbol: Option<&str>,
    source: &dyn PriceSource,
) -> Result<Decimal, LedgerError> {
    if let Some(price) = manual {
        if price < Decimal::ZERO {
            return Err(LedgerError::invalid_price(symbol.unwrap_or_default(), price));
        }
        return Ok(price);
    }

    let symbol = symbol
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| LedgerError::upstream("", "no symbol"))?;

    match source.fetch_price(symbol) {
        Ok(quote) => {
            tracing::debug!(
                symbol,
                price = %quote.price,
                source = source.name(),
                "resolved live price"
            );
            Ok(quote.price)
        }
        Err(e) => {
            tracing::warn!(symbol, source = source.name(), "price lookup failed: {e}");
            Err(e)
        }
    }
}

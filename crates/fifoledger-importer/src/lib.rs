//! Transaction intake for fifoledger
//!
//! Every adapter here turns an external representation into a [`Batch`]:
//! an ordered list of [`TransactionRecord`]s for one instrument, plus an
//! optional manual market price. Ordering is taken as given; the ledger
//! trusts it.
//!
//! - [`json`] - Signed-share records and request bodies, typed records
//! - [`csv_importer`] - Tabular rows with configurable columns
//!
//! # Example
//!
//! ```
//! use fifoledger_importer::json::parse_input;
//!
//! let batch = parse_input(r#"[
//!     {"stock_name_t": "AAPL", "number_of_shares": 10, "stock_price": 150},
//!     {"stock_name_t": "AAPL", "number_of_shares": -4}
//! ]"#).unwrap();
//!
//! assert_eq!(batch.symbol.as_deref(), Some("AAPL"));
//! assert_eq!(batch.records.len(), 2);
//!
//! let mut ledger = batch.ledger();
//! ledger.replay(&batch.records).unwrap();
//! assert_eq!(ledger.total_quantity().to_string(), "6");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod csv_importer;
pub mod json;

use fifoledger_core::{Ledger, LedgerError, TransactionRecord};
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

pub use config::{ColumnSpec, CsvConfig};
pub use csv_importer::CsvImporter;

/// Symbol used for ledgers whose input never named an instrument.
pub const UNNAMED_SYMBOL: &str = "UNNAMED";

/// Error returned when input cannot be turned into transaction records.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input was not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The CSV reader failed.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A configured column is not present.
    #[error("column {0} not found")]
    MissingColumn(String),
    /// The transaction type cell is not buy or sell.
    #[error("record {index}: {message}")]
    UnknownKind {
        /// Zero-based record index.
        index: usize,
        /// Parser message.
        message: String,
    },
    /// Records in one batch name different instruments.
    #[error("record {index}: expected instrument {expected}, got {got}")]
    MixedInstruments {
        /// Zero-based record index.
        index: usize,
        /// Instrument of the first record.
        expected: String,
        /// Instrument of the offending record.
        got: String,
    },
    /// A record carried an invalid quantity or price.
    #[error("record {index}: {error}")]
    Record {
        /// Zero-based record index.
        index: usize,
        /// What was wrong with it.
        error: LedgerError,
    },
}

/// Ordered transactions for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Instrument named by the input, if any.
    pub symbol: Option<String>,
    /// Records in chronological order.
    pub records: Vec<TransactionRecord>,
    /// Manual market price supplied with the input.
    pub current_price: Option<Decimal>,
}

impl Batch {
    /// Check if the batch has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// An empty ledger for this batch's instrument.
    #[must_use]
    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.symbol.as_deref().unwrap_or(UNNAMED_SYMBOL))
    }
}

/// Track the instrument of a batch, rejecting a second, different one.
pub(crate) fn check_symbol(
    current: &mut Option<String>,
    index: usize,
    symbol: &str,
) -> Result<(), ImportError> {
    match current {
        Some(expected) if expected != symbol => Err(ImportError::MixedInstruments {
            index,
            expected: expected.clone(),
            got: symbol.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            *current = Some(symbol.to_string());
            Ok(())
        }
    }
}

/// Parse a quantity cell; anything that is not a finite decimal is invalid.
pub(crate) fn parse_quantity(symbol: &str, index: usize, raw: &str) -> Result<Decimal, ImportError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| ImportError::Record {
            index,
            error: LedgerError::invalid_quantity(symbol, raw.trim()),
        })
}

/// Parse a price cell. Blank means missing, not zero.
pub(crate) fn parse_price(
    symbol: &str,
    index: usize,
    raw: &str,
) -> Result<Option<Decimal>, ImportError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Decimal>()
        .map(Some)
        .map_err(|_| ImportError::Record {
            index,
            error: LedgerError::invalid_price(symbol, raw),
        })
}

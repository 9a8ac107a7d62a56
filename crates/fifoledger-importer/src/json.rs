//! JSON intake.
//!
//! Two shapes are understood:
//!
//! - Signed-share records, where a positive `number_of_shares` is a buy and a
//!   negative one a sell. These arrive either as a bare list or wrapped in a
//!   [`CalculateRequest`] together with an optional `current_price`.
//! - Typed records (`{"type": "buy", "quantity": 100, "price_per_unit": 50}`),
//!   which deserialize straight into [`TransactionRecord`].

use fifoledger_core::{LedgerError, TransactionKind, TransactionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{check_symbol, Batch, ImportError, UNNAMED_SYMBOL};

/// One transaction with a signed share count.
///
/// Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedShareRecord {
    /// Instrument symbol.
    #[serde(rename = "stock_name_t", alias = "Stock_Name")]
    pub stock_name: String,
    /// Positive for a buy, negative for a sell.
    #[serde(rename = "number_of_shares", alias = "Number_of_Shares")]
    pub number_of_shares: Decimal,
    /// Purchase price per share; only meaningful for buys.
    #[serde(rename = "stock_price", alias = "Stock_Price", default)]
    pub stock_price: Option<Decimal>,
}

impl SignedShareRecord {
    /// Convert into a [`TransactionRecord`].
    ///
    /// A zero share count names neither a buy nor a sell and is rejected.
    /// A buy without a price is passed through; the ledger reports it.
    pub fn to_record(&self, index: usize) -> Result<TransactionRecord, ImportError> {
        let shares = self.number_of_shares;
        if shares > Decimal::ZERO {
            Ok(TransactionRecord {
                kind: TransactionKind::Buy,
                quantity: shares,
                unit_price: self.stock_price,
            })
        } else if shares < Decimal::ZERO {
            Ok(TransactionRecord::sell(shares.abs()))
        } else {
            Err(ImportError::Record {
                index,
                error: LedgerError::invalid_quantity(&self.stock_name, shares),
            })
        }
    }
}

/// Request body of the calculation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// Transactions in chronological order.
    pub transactions: Vec<SignedShareRecord>,
    /// Manual market price; when absent the live price is fetched.
    #[serde(default)]
    pub current_price: Option<Decimal>,
}

impl CalculateRequest {
    /// Convert into a [`Batch`].
    pub fn into_batch(self) -> Result<Batch, ImportError> {
        let mut batch = batch_from_signed(&self.transactions)?;
        batch.current_price = self.current_price;
        Ok(batch)
    }
}

/// Build a batch from signed-share records.
///
/// The instrument of the batch is the first record's; later records must
/// name the same one.
pub fn batch_from_signed(records: &[SignedShareRecord]) -> Result<Batch, ImportError> {
    let mut symbol = None;
    let records = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            check_symbol(&mut symbol, index, &record.stock_name)?;
            record.to_record(index)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Batch {
        symbol,
        records,
        current_price: None,
    })
}

/// Parse either a bare list of signed-share records or a request body.
pub fn parse_input(json: &str) -> Result<Batch, ImportError> {
    if json.trim_start().starts_with('{') {
        let request: CalculateRequest = serde_json::from_str(json)?;
        request.into_batch()
    } else {
        let records: Vec<SignedShareRecord> = serde_json::from_str(json)?;
        batch_from_signed(&records)
    }
}

/// Read and parse a signed-share JSON file.
pub fn parse_input_file(path: &Path) -> Result<Batch, ImportError> {
    let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_input(&content)
}

/// Parse a list of typed records.
///
/// The instrument is not part of this shape and is supplied by the caller.
pub fn parse_typed_records(json: &str, symbol: Option<&str>) -> Result<Batch, ImportError> {
    let records: Vec<TransactionRecord> = serde_json::from_str(json)?;
    for (index, record) in records.iter().enumerate() {
        if record.quantity <= Decimal::ZERO {
            return Err(ImportError::Record {
                index,
                error: LedgerError::invalid_quantity(
                    symbol.unwrap_or(UNNAMED_SYMBOL),
                    record.quantity,
                ),
            });
        }
    }

    Ok(Batch {
        symbol: symbol.map(str::to_string),
        records,
        current_price: None,
    })
}

//! Transaction records and sequential replay.
//!
//! A [`TransactionRecord`] is the shape every intake adapter produces.
//! Records are trusted to arrive in chronological order; [`Ledger::replay`]
//! applies them one at a time and stops at the first failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{Ledger, LedgerError, Sale};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Units were bought and open a new lot.
    Buy,
    /// Units were sold out of the oldest lots.
    Sell,
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "b" | "long" => Ok(Self::Buy),
            "sell" | "s" | "short" => Ok(Self::Sell),
            _ => Err(format!("'{s}' is not a valid transaction type")),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// One buy or sell, as handed over by an intake adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Buy or sell.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Units traded; always positive.
    pub quantity: Decimal,
    /// Price per unit. Required for buys, ignored for sells.
    #[serde(
        rename = "price_per_unit",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<Decimal>,
}

impl TransactionRecord {
    /// A buy at a known price.
    #[must_use]
    pub const fn buy(quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            kind: TransactionKind::Buy,
            quantity,
            unit_price: Some(unit_price),
        }
    }

    /// A sell.
    #[must_use]
    pub const fn sell(quantity: Decimal) -> Self {
        Self {
            kind: TransactionKind::Sell,
            quantity,
            unit_price: None,
        }
    }
}

/// Outcome of replaying a sequence of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Every sale, in the order it happened.
    pub sales: Vec<Sale>,
    /// Sum of the realized cost of all sales.
    pub total_cost_of_sales: Decimal,
}

/// A record in a replayed sequence was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transaction {index}: {error}")]
pub struct ReplayError {
    /// Zero-based position of the failing record.
    pub index: usize,
    /// Why the record was rejected.
    pub error: LedgerError,
}

impl Ledger {
    /// Apply a single record.
    ///
    /// Returns the [`Sale`] for sells and `None` for buys.
    pub fn apply(&mut self, record: &TransactionRecord) -> Result<Option<Sale>, LedgerError> {
        match record.kind {
            TransactionKind::Buy => {
                let unit_price = record.unit_price.ok_or_else(|| LedgerError::MissingPrice {
                    symbol: self.symbol().to_string(),
                    quantity: record.quantity,
                })?;
                self.buy(record.quantity, unit_price)?;
                Ok(None)
            }
            TransactionKind::Sell => self.sell(record.quantity).map(Some),
        }
    }

    /// Apply records in order.
    ///
    /// On failure the records before the failing one stay applied and the
    /// failing one leaves no trace.
    pub fn replay<'a, I>(&mut self, records: I) -> Result<ReplaySummary, ReplayError>
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut summary = ReplaySummary::default();

        for (index, record) in records.into_iter().enumerate() {
            let fail = |error| ReplayError { index, error };
            match record.kind {
                TransactionKind::Buy => {
                    self.apply(record).map_err(fail)?;
                }
                TransactionKind::Sell => {
                    let (sale, rest) = self.plan_sale(record.quantity).map_err(fail)?;
                    let total = summary
                        .total_cost_of_sales
                        .checked_add(sale.realized_cost)
                        .ok_or_else(|| {
                            fail(LedgerError::overflow(self.symbol(), "total cost of sales"))
                        })?;
                    self.commit_sale(&sale, rest);
                    summary.total_cost_of_sales = total;
                    summary.sales.push(sale);
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lot;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("BUY".parse::<TransactionKind>(), Ok(TransactionKind::Buy));
        assert_eq!(" sell ".parse::<TransactionKind>(), Ok(TransactionKind::Sell));
        assert_eq!("s".parse::<TransactionKind>(), Ok(TransactionKind::Sell));
        assert!("hold".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_apply_buy_without_price() {
        let mut ledger = Ledger::new("XYZ");
        let record = TransactionRecord {
            kind: TransactionKind::Buy,
            quantity: dec!(10),
            unit_price: None,
        };

        assert_eq!(
            ledger.apply(&record),
            Err(LedgerError::MissingPrice {
                symbol: "XYZ".to_string(),
                quantity: dec!(10),
            })
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_apply_sell_ignores_price() {
        let mut ledger = Ledger::new("XYZ");
        ledger.apply(&TransactionRecord::buy(dec!(10), dec!(5))).unwrap();

        let record = TransactionRecord {
            kind: TransactionKind::Sell,
            quantity: dec!(4),
            unit_price: Some(dec!(999)),
        };
        let sale = ledger.apply(&record).unwrap().unwrap();
        assert_eq!(sale.cost_per_unit, dec!(5));
    }

    #[test]
    fn test_replay_tabular_sequence() {
        let records = [
            TransactionRecord::buy(dec!(100), dec!(50)),
            TransactionRecord::buy(dec!(200), dec!(55)),
            TransactionRecord::sell(dec!(150)),
            TransactionRecord::buy(dec!(150), dec!(60)),
            TransactionRecord::sell(dec!(100)),
        ];

        let mut ledger = Ledger::new("XYZ");
        let summary = ledger.replay(&records).unwrap();

        assert_eq!(summary.sales.len(), 2);
        assert_eq!(summary.sales[0].realized_cost, dec!(7750));
        assert_eq!(summary.sales[1].realized_cost, dec!(5500));
        assert_eq!(summary.total_cost_of_sales, dec!(13250));
        assert_eq!(
            ledger.lots(),
            &[Lot::new(dec!(50), dec!(55)), Lot::new(dec!(150), dec!(60))]
        );
    }

    #[test]
    fn test_replay_stops_at_failure() {
        let records = [
            TransactionRecord::buy(dec!(10), dec!(1)),
            TransactionRecord::sell(dec!(11)),
            TransactionRecord::buy(dec!(5), dec!(2)),
        ];

        let mut ledger = Ledger::new("XYZ");
        let err = ledger.replay(&records).unwrap_err();

        assert_eq!(err.index, 1);
        assert!(matches!(
            err.error,
            LedgerError::InsufficientInventory { .. }
        ));
        assert_eq!(ledger.lots(), &[Lot::new(dec!(10), dec!(1))]);
    }

    #[test]
    fn test_replay_rejects_cost_of_sales_overflow() {
        let hundred_trillion = dec!(100000000000000);
        let five_hundred_trillion = dec!(500000000000000);
        let records = [
            TransactionRecord::buy(hundred_trillion, five_hundred_trillion),
            TransactionRecord::sell(hundred_trillion),
            TransactionRecord::buy(hundred_trillion, five_hundred_trillion),
            TransactionRecord::sell(hundred_trillion),
        ];

        let mut ledger = Ledger::new("XYZ");
        let err = ledger.replay(&records).unwrap_err();

        assert_eq!(err.index, 3);
        assert_eq!(err.error, LedgerError::overflow("XYZ", "total cost of sales"));
        assert_eq!(
            ledger.lots(),
            &[Lot::new(hundred_trillion, five_hundred_trillion)]
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"type": "sell", "quantity": 150}"#).unwrap();
        assert_eq!(record, TransactionRecord::sell(dec!(150)));

        let record: TransactionRecord = serde_json::from_str(
            r#"{"type": "buy", "quantity": 100, "price_per_unit": 50.5}"#,
        )
        .unwrap();
        assert_eq!(record, TransactionRecord::buy(dec!(100), dec!(50.5)));
    }
}

//! Core types for fifoledger
//!
//! This crate provides the cost-basis types shared by every fifoledger tool:
//!
//! - [`Lot`] - Units bought together at one price
//! - [`Ledger`] - The open lots of one instrument, matched first-in-first-out
//! - [`Sale`] - Realized cost of a sale
//! - [`Valuation`] - Unrealized gain or loss of the remaining lots at a market price
//! - [`TransactionRecord`] - A buy or sell handed over by an intake adapter
//! - [`LedgerError`] - Everything that can go wrong
//!
//! # Example
//!
//! ```
//! use fifoledger_core::{Ledger, Lot};
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = Ledger::new("XYZ");
//! ledger.buy(dec!(100), dec!(50)).unwrap();
//! ledger.buy(dec!(200), dec!(55)).unwrap();
//!
//! // Sell across both lots, oldest first
//! let sale = ledger.sell(dec!(150)).unwrap();
//! assert_eq!(sale.realized_cost, dec!(7750)); // 100 * 50 + 50 * 55
//! assert_eq!(ledger.lots(), &[Lot::new(dec!(150), dec!(55))]);
//!
//! let valuation = ledger.valuation(dec!(60)).unwrap();
//! assert_eq!(valuation.gain_loss, dec!(750));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod ledger;
pub mod lot;
pub mod transaction;

pub use error::LedgerError;
pub use ledger::{Ledger, Sale, Valuation};
pub use lot::Lot;
pub use transaction::{ReplayError, ReplaySummary, TransactionKind, TransactionRecord};

//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error that can occur while recording transactions or valuing a ledger.
///
/// Every variant is recoverable by the caller: it signals bad input or
/// unavailable external data, never internal corruption. The ledger is
/// left unchanged whenever one of these is returned from a mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Quantity was zero, negative, or could not be represented.
    #[error("invalid quantity for {symbol}: {quantity}")]
    InvalidQuantity {
        /// The instrument being traded.
        symbol: String,
        /// The rejected quantity, as given.
        quantity: String,
    },
    /// Price was negative or could not be represented.
    #[error("invalid price for {symbol}: {price}")]
    InvalidPrice {
        /// The instrument being traded.
        symbol: String,
        /// The rejected price, as given.
        price: String,
    },
    /// A buy was recorded without a unit price.
    #[error("missing unit price for buy of {quantity} {symbol}")]
    MissingPrice {
        /// The instrument being bought.
        symbol: String,
        /// Quantity of the buy that lacked a price.
        quantity: Decimal,
    },
    /// A sell asked for more units than the ledger holds.
    #[error("insufficient inventory of {symbol}: requested {requested}, available {available}")]
    InsufficientInventory {
        /// The instrument being sold.
        symbol: String,
        /// Units requested.
        requested: Decimal,
        /// Units available.
        available: Decimal,
    },
    /// An amount grew past what a decimal can represent.
    #[error("amount out of range for {symbol}: {operation}")]
    Overflow {
        /// The instrument being traded or valued.
        symbol: String,
        /// The computation that overflowed.
        operation: String,
    },
    /// The market price collaborator failed or returned no data.
    #[error("price unavailable for {symbol}: {reason}")]
    UpstreamPriceUnavailable {
        /// The instrument whose price was requested.
        symbol: String,
        /// What went wrong upstream.
        reason: String,
    },
}

impl LedgerError {
    /// Build an [`LedgerError::InvalidQuantity`] from any displayable value.
    pub fn invalid_quantity(symbol: impl Into<String>, quantity: impl ToString) -> Self {
        Self::InvalidQuantity {
            symbol: symbol.into(),
            quantity: quantity.to_string(),
        }
    }

    /// Build an [`LedgerError::InvalidPrice`] from any displayable value.
    pub fn invalid_price(symbol: impl Into<String>, price: impl ToString) -> Self {
        Self::InvalidPrice {
            symbol: symbol.into(),
            price: price.to_string(),
        }
    }

    /// Build an [`LedgerError::UpstreamPriceUnavailable`].
    pub fn upstream(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self::UpstreamPriceUnavailable {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`LedgerError::Overflow`].
    pub fn overflow(symbol: impl Into<String>, operation: impl ToString) -> Self {
        Self::Overflow {
            symbol: symbol.into(),
            operation: operation.to_string(),
        }
    }

    /// True for errors caused by the external price collaborator.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamPriceUnavailable { .. })
    }
}

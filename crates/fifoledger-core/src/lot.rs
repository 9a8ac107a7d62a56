//! Lot type representing one batch of purchased units.
//!
//! A [`Lot`] is created by a buy and lives in a [`Ledger`](crate::Ledger)
//! until sales have consumed all of its units. Its unit price is fixed at
//! creation; only the remaining quantity ever changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A batch of units bought at a single price.
///
/// # Examples
///
/// ```
/// use fifoledger_core::Lot;
/// use rust_decimal_macros::dec;
///
/// let lot = Lot::new(dec!(100), dec!(150));
/// assert_eq!(lot.cost(), dec!(15000));
///
/// let (taken, rest) = lot.split(dec!(40));
/// assert_eq!(taken, Lot::new(dec!(40), dec!(150)));
/// assert_eq!(rest, Lot::new(dec!(60), dec!(150)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lot {
    /// Units remaining in this lot.
    pub quantity: Decimal,
    /// Purchase price per unit.
    #[serde(rename = "price_per_unit")]
    pub unit_price: Decimal,
}

impl Lot {
    /// Create a new lot.
    ///
    /// No validation happens here; the ledger checks inputs before
    /// a lot is ever constructed.
    #[must_use]
    pub const fn new(quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
        }
    }

    /// Total cost of the units remaining in this lot.
    ///
    /// Panics if the product is not representable; a [`Ledger`](crate::Ledger)
    /// only admits lots whose cost passed [`Lot::checked_cost`].
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// Total cost, or `None` when it does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_cost(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }

    /// Check if this lot has no units left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Split into the part taken and the part left behind.
    ///
    /// `quantity` is expected to be within `0..=self.quantity`.
    #[must_use]
    pub fn split(&self, quantity: Decimal) -> (Self, Self) {
        (
            Self::new(quantity, self.unit_price),
            Self::new(self.quantity - quantity, self.unit_price),
        )
    }
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.quantity, self.unit_price)
    }
}

//! FIFO ledger for a single instrument.
//!
//! A [`Ledger`] keeps the open [`Lot`]s of one instrument in purchase
//! order. Buys append to the back; sells consume from the front, oldest
//! first, splitting the front lot when a sale ends inside it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::{LedgerError, Lot};

/// Result of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Units sold.
    pub quantity: Decimal,
    /// Total cost basis of the units sold.
    pub realized_cost: Decimal,
    /// Weighted average cost per unit sold (`realized_cost / quantity`).
    pub cost_per_unit: Decimal,
    /// Slices taken from each touched lot, oldest first.
    pub consumed: Vec<Lot>,
}

/// Unrealized position of the remaining inventory at a market price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Instrument symbol.
    pub symbol: String,
    /// Market price the inventory was valued at.
    pub current_price: Decimal,
    /// Open lots, oldest first.
    pub remaining_inventory: Vec<Lot>,
    /// Units still held.
    pub total_quantity: Decimal,
    /// Cost basis of the open lots.
    #[serde(rename = "total_inventory_cost")]
    pub total_cost: Decimal,
    /// Units held times the market price.
    #[serde(rename = "total_inventory_value")]
    pub total_value: Decimal,
    /// `total_value - total_cost`.
    #[serde(rename = "potential_gain_loss")]
    pub gain_loss: Decimal,
}

/// Open lots of one instrument, matched first-in-first-out.
///
/// # Examples
///
/// ```
/// use fifoledger_core::{Ledger, Lot};
/// use rust_decimal_macros::dec;
///
/// let mut aapl = Ledger::new("AAPL");
/// aapl.buy(dec!(100), dec!(150)).unwrap();
/// aapl.buy(dec!(50), dec!(160)).unwrap();
///
/// let sale = aapl.sell(dec!(75)).unwrap();
/// assert_eq!(sale.cost_per_unit, dec!(150));
/// assert_eq!(aapl.lots(), &[Lot::new(dec!(25), dec!(150)), Lot::new(dec!(50), dec!(160))]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ledger {
    symbol: String,
    lots: VecDeque<Lot>,
    total_quantity: Decimal,
}

impl Ledger {
    /// Create an empty ledger for an instrument.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            lots: VecDeque::new(),
            total_quantity: Decimal::ZERO,
        }
    }

    /// Instrument symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Open lots, oldest first.
    #[must_use]
    pub const fn lots(&self) -> &VecDeque<Lot> {
        &self.lots
    }

    /// Number of open lots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    /// Check if no units are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Units held across all lots.
    #[must_use]
    pub const fn total_quantity(&self) -> Decimal {
        self.total_quantity
    }

    /// Cost basis of all open lots.
    ///
    /// `buy` refuses any lot that would push this sum out of range, and
    /// sells only shrink it, so the sum always fits.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.lots.iter().map(Lot::cost).sum()
    }

    /// Record a purchase.
    ///
    /// `unit_price` may be zero (e.g. granted shares) but not negative.
    /// A buy whose quantity or cost would no longer fit in a `Decimal` is
    /// rejected with [`LedgerError::Overflow`] and changes nothing.
    pub fn buy(&mut self, quantity: Decimal, unit_price: Decimal) -> Result<(), LedgerError> {
        self.check_quantity(quantity)?;
        if unit_price < Decimal::ZERO {
            return Err(LedgerError::invalid_price(&self.symbol, unit_price));
        }

        let lot = Lot::new(quantity, unit_price);
        let total_quantity = self
            .total_quantity
            .checked_add(quantity)
            .ok_or_else(|| LedgerError::overflow(&self.symbol, "total quantity"))?;
        lot.checked_cost()
            .and_then(|cost| self.total_cost().checked_add(cost))
            .ok_or_else(|| LedgerError::overflow(&self.symbol, "total cost"))?;

        self.lots.push_back(lot);
        self.total_quantity = total_quantity;
        Ok(())
    }

    /// Record a sale, consuming the oldest lots first.
    ///
    /// Fails without touching the ledger if `quantity` is not positive or
    /// exceeds the units held.
    pub fn sell(&mut self, quantity: Decimal) -> Result<Sale, LedgerError> {
        let (sale, rest) = self.plan_sale(quantity)?;
        self.commit_sale(&sale, rest);
        Ok(sale)
    }

    /// Work out a sale without changing anything.
    ///
    /// Returns the sale and, when it ends inside a lot, what is left of
    /// that lot.
    pub(crate) fn plan_sale(
        &self,
        quantity: Decimal,
    ) -> Result<(Sale, Option<Lot>), LedgerError> {
        self.check_quantity(quantity)?;
        if quantity > self.total_quantity {
            return Err(LedgerError::InsufficientInventory {
                symbol: self.symbol.clone(),
                requested: quantity,
                available: self.total_quantity,
            });
        }

        let mut remaining = quantity;
        let mut realized_cost = Decimal::ZERO;
        let mut consumed = Vec::new();
        let mut rest = None;

        // The pre-check guarantees the lots cover `remaining`.
        for lot in &self.lots {
            if remaining.is_zero() {
                break;
            }

            let taken = if lot.quantity <= remaining {
                *lot
            } else {
                let (taken, left) = lot.split(remaining);
                rest = Some(left);
                taken
            };

            remaining -= taken.quantity;
            realized_cost += taken.cost();
            consumed.push(taken);
        }

        let cost_per_unit = realized_cost
            .checked_div(quantity)
            .ok_or_else(|| LedgerError::overflow(&self.symbol, "cost per unit"))?;

        let sale = Sale {
            quantity,
            realized_cost,
            cost_per_unit,
            consumed,
        };
        Ok((sale, rest))
    }

    /// Apply a sale produced by [`Ledger::plan_sale`] on this same state.
    pub(crate) fn commit_sale(&mut self, sale: &Sale, rest: Option<Lot>) {
        let whole_lots = sale.consumed.len() - usize::from(rest.is_some());
        self.lots.drain(..whole_lots);
        if let (Some(rest), Some(front)) = (rest, self.lots.front_mut()) {
            *front = rest;
        }
        self.total_quantity -= sale.quantity;
    }

    /// Weighted average unit cost of the open lots.
    ///
    /// An empty ledger reports zero.
    #[must_use]
    pub fn average_cost(&self) -> Decimal {
        if self.total_quantity.is_zero() {
            return Decimal::ZERO;
        }
        self.total_cost() / self.total_quantity
    }

    /// Value the open lots at a market price.
    ///
    /// A price so large that the value does not fit is reported as
    /// [`LedgerError::Overflow`].
    pub fn valuation(&self, current_price: Decimal) -> Result<Valuation, LedgerError> {
        if current_price < Decimal::ZERO {
            return Err(LedgerError::invalid_price(&self.symbol, current_price));
        }

        let total_cost = self.total_cost();
        let total_value = self
            .total_quantity
            .checked_mul(current_price)
            .ok_or_else(|| LedgerError::overflow(&self.symbol, "inventory value"))?;

        Ok(Valuation {
            symbol: self.symbol.clone(),
            current_price,
            remaining_inventory: self.lots.iter().copied().collect(),
            total_quantity: self.total_quantity,
            total_cost,
            total_value,
            // Both sides are non-negative, so the difference fits.
            gain_loss: total_value - total_cost,
        })
    }

    fn check_quantity(&self, quantity: Decimal) -> Result<(), LedgerError> {
        if quantity <= Decimal::ZERO {
            return Err(LedgerError::invalid_quantity(&self.symbol, quantity));
        }
        Ok(())
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lots.is_empty() {
            return write!(f, "(empty)");
        }

        for (i, lot) in self.lots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lot}")?;
        }
        Ok(())
    }
}

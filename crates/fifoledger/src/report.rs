//! Rendering of ledger results.
//!
//! Text output rounds every amount to two decimals for display only; the
//! JSON output carries the exact values.

use fifoledger_core::{ReplaySummary, Valuation};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::{self, Write};

/// Round half away from zero to cents; `{:.2}` alone truncates.
fn cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Valuation plus, for tabular input, the realized sales.
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    /// Remaining inventory at the market price.
    #[serde(flatten)]
    pub valuation: &'a Valuation,
    /// Sales replayed along the way.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<&'a ReplaySummary>,
}

/// Write the remaining inventory and its unrealized position.
pub fn write_valuation<W: Write>(writer: &mut W, valuation: &Valuation) -> io::Result<()> {
    writeln!(writer, "Remaining inventory ({}):", valuation.symbol)?;
    if valuation.remaining_inventory.is_empty() {
        writeln!(writer, "  (none)")?;
    }
    for lot in &valuation.remaining_inventory {
        writeln!(
            writer,
            "  {:.2} @ {:.2}",
            cents(lot.quantity),
            cents(lot.unit_price)
        )?;
    }
    writeln!(writer, "Current price: {:.2}", cents(valuation.current_price))?;
    writeln!(writer, "Total inventory cost: {:.2}", cents(valuation.total_cost))?;
    writeln!(writer, "Total inventory value: {:.2}", cents(valuation.total_value))?;
    writeln!(writer, "Potential gain/loss: {:.2}", cents(valuation.gain_loss))
}

/// Write the cost of each sale and the total cost of sales.
pub fn write_sales<W: Write>(writer: &mut W, summary: &ReplaySummary) -> io::Result<()> {
    for (i, sale) in summary.sales.iter().enumerate() {
        writeln!(
            writer,
            "Sale {}: {:.2} units, cost {:.2} ({:.2} per unit)",
            i + 1,
            cents(sale.quantity),
            cents(sale.realized_cost),
            cents(sale.cost_per_unit)
        )?;
    }
    writeln!(
        writer,
        "Total cost of sales: {:.2}",
        cents(summary.total_cost_of_sales)
    )
}

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(writer: &mut W, report: &BatchReport<'_>) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)
}

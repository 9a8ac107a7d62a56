use fifoledger_core::{Lot, Valuation};
use rust_decimal::Decimal;
use serde::Serialize;

/// Successful response of the calculation endpoint.
#[derive(Serialize, Debug)]
pub struct CalculateResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The valuation.
    pub data: FifoData,
}

/// Remaining inventory and its unrealized position.
#[derive(Serialize, Debug)]
pub struct FifoData {
    /// Open lots, oldest first.
    pub remaining_inventory: Vec<Lot>,
    /// Cost basis of the open lots.
    pub total_inventory_cost: Decimal,
    /// Units held times the market price.
    pub total_inventory_value: Decimal,
    /// Value minus cost.
    pub potential_gain_loss: Decimal,
}

impl From<Valuation> for CalculateResponse {
    fn from(valuation: Valuation) -> Self {
        Self {
            status: "success",
            data: FifoData {
                remaining_inventory: valuation.remaining_inventory,
                total_inventory_cost: valuation.total_cost,
                total_inventory_value: valuation.total_value,
                potential_gain_loss: valuation.gain_loss,
            },
        }
    }
}

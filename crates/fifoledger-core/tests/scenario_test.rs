//! Worked buy/sell scenarios with hand-computed results.

use fifoledger_core::{Ledger, LedgerError, Lot};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn aapl_two_lots() -> Ledger {
    let mut ledger = Ledger::new("AAPL");
    ledger.buy(dec!(100), dec!(150)).unwrap();
    ledger.buy(dec!(50), dec!(160)).unwrap();
    ledger
}

#[test]
fn average_cost_of_two_lots() {
    let ledger = aapl_two_lots();

    // (100 * 150 + 50 * 160) / 150
    assert_eq!(ledger.average_cost().round_dp(2), dec!(153.33));
    assert_eq!(ledger.total_cost(), dec!(23000));
}

#[test]
fn sell_inside_first_lot() {
    let mut ledger = aapl_two_lots();
    let sale = ledger.sell(dec!(75)).unwrap();

    assert_eq!(sale.cost_per_unit, dec!(150));
    assert_eq!(
        ledger.lots(),
        &[Lot::new(dec!(25), dec!(150)), Lot::new(dec!(50), dec!(160))]
    );
    // (25 * 150 + 50 * 160) / 75
    assert_eq!(ledger.average_cost().round_dp(2), dec!(156.67));
}

#[test]
fn realized_cost_differs_from_remaining_average() {
    let mut ledger = aapl_two_lots();
    let sale = ledger.sell(dec!(75)).unwrap();

    assert_ne!(sale.cost_per_unit, ledger.average_cost());
}

#[test]
fn sell_across_two_lots() {
    let mut ledger = Ledger::new("XYZ");
    ledger.buy(dec!(100), dec!(50)).unwrap();
    ledger.buy(dec!(200), dec!(55)).unwrap();

    let sale = ledger.sell(dec!(150)).unwrap();

    assert_eq!(sale.realized_cost, dec!(7750));
    assert_eq!(sale.cost_per_unit.round_dp(2), dec!(51.67));
    assert_eq!(
        sale.consumed,
        vec![Lot::new(dec!(100), dec!(50)), Lot::new(dec!(50), dec!(55))]
    );
    assert_eq!(ledger.lots(), &[Lot::new(dec!(150), dec!(55))]);
    assert_eq!(ledger.total_quantity(), dec!(150));
}

#[test]
fn sell_from_empty_ledger_fails_unchanged() {
    let mut ledger = Ledger::new("XYZ");
    let before = ledger.clone();

    let err = ledger.sell(dec!(1)).unwrap_err();

    assert_eq!(
        err,
        LedgerError::InsufficientInventory {
            symbol: "XYZ".to_string(),
            requested: dec!(1),
            available: Decimal::ZERO,
        }
    );
    assert_eq!(ledger, before);
}

#[test]
fn valuation_gain() {
    let mut ledger = Ledger::new("XYZ");
    ledger.buy(dec!(10), dec!(20)).unwrap();

    let valuation = ledger.valuation(dec!(25)).unwrap();

    assert_eq!(valuation.total_cost, dec!(200));
    assert_eq!(valuation.total_value, dec!(250));
    assert_eq!(valuation.gain_loss, dec!(50));
}

#[test]
fn valuation_loss() {
    let mut ledger = Ledger::new("XYZ");
    ledger.buy(dec!(10), dec!(20)).unwrap();
    ledger.buy(dec!(10), dec!(30)).unwrap();
    ledger.sell(dec!(5)).unwrap();

    let valuation = ledger.valuation(dec!(18)).unwrap();

    // 5 * 20 + 10 * 30 = 400, 15 * 18 = 270
    assert_eq!(valuation.total_cost, dec!(400));
    assert_eq!(valuation.total_value, dec!(270));
    assert_eq!(valuation.gain_loss, dec!(-130));
}

#[test]
fn reporting_is_repeatable() {
    let ledger = aapl_two_lots();

    assert_eq!(ledger.average_cost(), ledger.average_cost());
    assert_eq!(ledger.valuation(dec!(170)), ledger.valuation(dec!(170)));
}

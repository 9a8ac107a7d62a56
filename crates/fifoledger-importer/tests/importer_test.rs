//! File-based intake feeding a ledger end to end.

use fifoledger_core::{LedgerError, Lot};
use fifoledger_importer::json::parse_input_file;
use fifoledger_importer::{CsvConfig, CsvImporter, ImportError};
use rust_decimal_macros::dec;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn csv_file_replays_into_ledger() {
    let file = write_temp(
        "type,quantity,price_per_unit\n\
         buy,100,50\n\
         buy,200,55\n\
         sell,150,\n\
         buy,150,60\n\
         sell,100,\n",
    );

    let config = CsvConfig::builder().symbol("XYZ").build();
    let batch = CsvImporter::new(config).extract_file(file.path()).unwrap();

    let mut ledger = batch.ledger();
    let summary = ledger.replay(&batch.records).unwrap();

    assert_eq!(ledger.symbol(), "XYZ");
    assert_eq!(summary.total_cost_of_sales, dec!(13250));
    assert_eq!(
        ledger.lots(),
        &[Lot::new(dec!(50), dec!(55)), Lot::new(dec!(150), dec!(60))]
    );
}

#[test]
fn json_file_with_missing_buy_price_is_reported_by_ledger() {
    let file = write_temp(
        r#"[
            {"stock_name_t": "AAPL", "number_of_shares": 10, "stock_price": 100},
            {"stock_name_t": "AAPL", "number_of_shares": 5}
        ]"#,
    );

    let batch = parse_input_file(file.path()).unwrap();
    let mut ledger = batch.ledger();
    let err = ledger.replay(&batch.records).unwrap_err();

    assert_eq!(err.index, 1);
    assert_eq!(
        err.error,
        LedgerError::MissingPrice {
            symbol: "AAPL".to_string(),
            quantity: dec!(5),
        }
    );
    assert_eq!(ledger.total_quantity(), dec!(10));
}

#[test]
fn json_request_valuation() {
    let file = write_temp(
        r#"{
            "transactions": [
                {"stock_name_t": "AAPL", "number_of_shares": 100, "stock_price": 150},
                {"stock_name_t": "AAPL", "number_of_shares": 50, "stock_price": 160},
                {"stock_name_t": "AAPL", "number_of_shares": -75}
            ],
            "current_price": 170
        }"#,
    );

    let batch = parse_input_file(file.path()).unwrap();
    let mut ledger = batch.ledger();
    ledger.replay(&batch.records).unwrap();
    let valuation = ledger.valuation(batch.current_price.unwrap()).unwrap();

    // 25 * 150 + 50 * 160 = 11750, 75 * 170 = 12750
    assert_eq!(valuation.total_cost, dec!(11750));
    assert_eq!(valuation.total_value, dec!(12750));
    assert_eq!(valuation.gain_loss, dec!(1000));
}

#[test]
fn missing_file_is_io_error() {
    let err = parse_input_file(Path::new("/nonexistent/transactions.json")).unwrap_err();
    assert!(matches!(err, ImportError::Io { .. }));
}

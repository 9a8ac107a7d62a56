//! CSV file importer.

use fifoledger_core::{LedgerError, TransactionKind, TransactionRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::{ColumnSpec, CsvConfig};
use crate::{check_symbol, parse_price, parse_quantity, Batch, ImportError, UNNAMED_SYMBOL};

/// Reads tabular buy/sell rows.
pub struct CsvImporter {
    config: CsvConfig,
}

impl CsvImporter {
    /// Create a new CSV importer with the given configuration.
    pub const fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Extract transactions from a file.
    pub fn extract_file(&self, path: &Path) -> Result<Batch, ImportError> {
        let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract_string(&content)
    }

    /// Extract transactions from string content.
    ///
    /// Rows whose type and quantity cells are both blank are skipped. Record
    /// indices in errors count data rows from zero, skipped rows included.
    pub fn extract_string(&self, content: &str) -> Result<Batch, ImportError> {
        let config = &self.config;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(config.has_header)
            .delimiter(config.delimiter as u8)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        // Build column name to index map from headers
        let header_map: HashMap<String, usize> = if config.has_header {
            reader
                .headers()?
                .iter()
                .enumerate()
                .map(|(i, h)| (h.to_string(), i))
                .collect()
        } else {
            HashMap::new()
        };

        let kind_index = resolve(&config.kind_column, &header_map)?;
        let quantity_index = resolve(&config.quantity_column, &header_map)?;
        let price_index = resolve(&config.price_column, &header_map)?;
        let symbol_index = config
            .symbol_column
            .as_ref()
            .map(|spec| resolve(spec, &header_map))
            .transpose()?;

        let mut symbol = config.symbol.clone();
        let mut records = Vec::new();

        for (index, row) in reader.records().enumerate().skip(config.skip_rows) {
            let row = row?;
            let kind_cell = row.get(kind_index).unwrap_or_default();
            let quantity_cell = row.get(quantity_index).unwrap_or_default();

            if kind_cell.is_empty() && quantity_cell.is_empty() {
                continue;
            }

            if let Some(i) = symbol_index {
                let row_symbol = row.get(i).unwrap_or_default();
                if !row_symbol.is_empty() {
                    check_symbol(&mut symbol, index, row_symbol)?;
                }
            }
            let name = symbol.as_deref().unwrap_or(UNNAMED_SYMBOL);

            let kind: TransactionKind = kind_cell
                .parse()
                .map_err(|message| ImportError::UnknownKind { index, message })?;
            let quantity = parse_quantity(name, index, quantity_cell)?;
            let unit_price = match kind {
                TransactionKind::Buy => {
                    parse_price(name, index, row.get(price_index).unwrap_or_default())?
                }
                TransactionKind::Sell => None,
            };

            if quantity <= Decimal::ZERO {
                return Err(ImportError::Record {
                    index,
                    error: LedgerError::invalid_quantity(name, quantity),
                });
            }

            records.push(TransactionRecord {
                kind,
                quantity,
                unit_price,
            });
        }

        Ok(Batch {
            symbol,
            records,
            current_price: None,
        })
    }
}

fn resolve(spec: &ColumnSpec, header_map: &HashMap<String, usize>) -> Result<usize, ImportError> {
    match spec {
        ColumnSpec::Index(i) => Ok(*i),
        ColumnSpec::Name(name) => header_map
            .get(name)
            .copied()
            .ok_or_else(|| ImportError::MissingColumn(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TABULAR: &str = "\
type,quantity,price_per_unit
buy,100,50
buy,200,55
sell,150,
buy,150,60
sell,100,
";

    #[test]
    fn test_extract_default_columns() {
        let batch = CsvImporter::new(CsvConfig::default())
            .extract_string(TABULAR)
            .unwrap();

        assert_eq!(batch.records.len(), 5);
        assert_eq!(batch.records[0], TransactionRecord::buy(dec!(100), dec!(50)));
        assert_eq!(batch.records[2], TransactionRecord::sell(dec!(150)));
        assert_eq!(batch.symbol, None);
    }

    #[test]
    fn test_blank_price_is_missing_not_zero() {
        let batch = CsvImporter::new(CsvConfig::default())
            .extract_string("type,quantity,price_per_unit\nbuy,5,\nbuy,5,0\n")
            .unwrap();

        assert_eq!(batch.records[0].unit_price, None);
        assert_eq!(batch.records[1].unit_price, Some(Decimal::ZERO));
    }

    #[test]
    fn test_index_columns_without_header() {
        let config = CsvConfig::builder()
            .has_header(false)
            .delimiter(';')
            .quantity_column_index(0)
            .kind_column_index(1)
            .price_column_index(2)
            .symbol("MSFT")
            .build();

        let batch = CsvImporter::new(config)
            .extract_string("10;BUY;20\n4;sell;\n")
            .unwrap();

        assert_eq!(batch.symbol.as_deref(), Some("MSFT"));
        assert_eq!(
            batch.records,
            vec![
                TransactionRecord::buy(dec!(10), dec!(20)),
                TransactionRecord::sell(dec!(4)),
            ]
        );
    }

    #[test]
    fn test_symbol_column_must_agree() {
        let config = CsvConfig::builder().symbol_column("symbol").build();
        let err = CsvImporter::new(config)
            .extract_string("symbol,type,quantity,price_per_unit\nA,buy,1,1\nB,sell,1,\n")
            .unwrap_err();

        assert!(matches!(err, ImportError::MixedInstruments { index: 1, .. }));
    }

    #[test]
    fn test_missing_column() {
        let err = CsvImporter::new(CsvConfig::default())
            .extract_string("kind,qty\nbuy,1\n")
            .unwrap_err();

        assert!(matches!(err, ImportError::MissingColumn(ref c) if c == "type"));
    }

    #[test]
    fn test_unknown_kind() {
        let err = CsvImporter::new(CsvConfig::default())
            .extract_string("type,quantity,price_per_unit\nhold,1,1\n")
            .unwrap_err();

        assert!(matches!(err, ImportError::UnknownKind { index: 0, .. }));
    }

    #[test]
    fn test_skips_blank_rows() {
        let batch = CsvImporter::new(CsvConfig::default())
            .extract_string("type,quantity,price_per_unit\n,,\nbuy,1,1\n")
            .unwrap();

        assert_eq!(batch.records.len(), 1);
    }

    #[test]
    fn test_skip_rows_drops_leading_data_rows() {
        let config = CsvConfig::builder().symbol("XYZ").skip_rows(2).build();
        let csv = "\
type,quantity,price_per_unit
opening,balance,
hold,x,y
buy,10,5
sell,4,
";

        let batch = CsvImporter::new(config).extract_string(csv).unwrap();

        assert_eq!(batch.symbol.as_deref(), Some("XYZ"));
        assert_eq!(
            batch.records,
            vec![
                TransactionRecord::buy(dec!(10), dec!(5)),
                TransactionRecord::sell(dec!(4)),
            ]
        );
    }

    #[test]
    fn test_skip_rows_keeps_record_indices() {
        let config = CsvConfig::builder().skip_rows(1).build();
        let err = CsvImporter::new(config)
            .extract_string("type,quantity,price_per_unit\nbuy,1,1\nhold,1,1\n")
            .unwrap_err();

        assert!(matches!(err, ImportError::UnknownKind { index: 1, .. }));
    }
}

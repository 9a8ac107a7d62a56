//! Configuration for the CSV importer.

/// Specification for a column in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Column specified by name (from header).
    Name(String),
    /// Column specified by zero-based index.
    Index(usize),
}

impl ColumnSpec {
    fn name(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Configuration for tabular transaction files.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column holding `buy` or `sell`.
    pub kind_column: ColumnSpec,
    /// Column holding the unsigned quantity.
    pub quantity_column: ColumnSpec,
    /// Column holding the unit price; blank cells mean "no price".
    pub price_column: ColumnSpec,
    /// Optional column naming the instrument.
    pub symbol_column: Option<ColumnSpec>,
    /// Instrument to use when the file has no symbol column.
    pub symbol: Option<String>,
    /// Whether the CSV has a header row.
    pub has_header: bool,
    /// The field delimiter.
    pub delimiter: char,
    /// Number of data rows to skip at the beginning.
    pub skip_rows: usize,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            kind_column: ColumnSpec::name("type"),
            quantity_column: ColumnSpec::name("quantity"),
            price_column: ColumnSpec::name("price_per_unit"),
            symbol_column: None,
            symbol: None,
            has_header: true,
            delimiter: ',',
            skip_rows: 0,
        }
    }
}

impl CsvConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> CsvConfigBuilder {
        CsvConfigBuilder::new()
    }
}

/// Builder for [`CsvConfig`].
pub struct CsvConfigBuilder {
    config: CsvConfig,
}

impl CsvConfigBuilder {
    /// Create a new builder with default columns.
    pub fn new() -> Self {
        Self {
            config: CsvConfig::default(),
        }
    }

    /// Set the transaction type column by name.
    pub fn kind_column(mut self, name: impl Into<String>) -> Self {
        self.config.kind_column = ColumnSpec::Name(name.into());
        self
    }

    /// Set the transaction type column by index.
    pub fn kind_column_index(mut self, index: usize) -> Self {
        self.config.kind_column = ColumnSpec::Index(index);
        self
    }

    /// Set the quantity column by name.
    pub fn quantity_column(mut self, name: impl Into<String>) -> Self {
        self.config.quantity_column = ColumnSpec::Name(name.into());
        self
    }

    /// Set the quantity column by index.
    pub fn quantity_column_index(mut self, index: usize) -> Self {
        self.config.quantity_column = ColumnSpec::Index(index);
        self
    }

    /// Set the price column by name.
    pub fn price_column(mut self, name: impl Into<String>) -> Self {
        self.config.price_column = ColumnSpec::Name(name.into());
        self
    }

    /// Set the price column by index.
    pub fn price_column_index(mut self, index: usize) -> Self {
        self.config.price_column = ColumnSpec::Index(index);
        self
    }

    /// Read the instrument from a column.
    pub fn symbol_column(mut self, name: impl Into<String>) -> Self {
        self.config.symbol_column = Some(ColumnSpec::Name(name.into()));
        self
    }

    /// Use a fixed instrument for every row.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.symbol = Some(symbol.into());
        self
    }

    /// Set whether the CSV has a header row.
    pub const fn has_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    /// Set the field delimiter.
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the number of rows to skip.
    pub const fn skip_rows(mut self, count: usize) -> Self {
        self.config.skip_rows = count;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CsvConfig {
        self.config
    }
}

impl Default for CsvConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

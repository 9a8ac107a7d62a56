//! FIFO calculator command.
//!
//! Replays a sequence of buys and sells for one instrument and values the
//! remaining lots at a market price. Input comes from a JSON or CSV file
//! (batch mode) or from prompts (interactive mode).

use crate::report::{self, BatchReport};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use fifoledger_core::{Ledger, ReplaySummary, TransactionRecord, Valuation};
use fifoledger_importer::json::{parse_input, parse_input_file};
use fifoledger_importer::{Batch, CsvConfig, CsvImporter};
use fifoledger_price::{resolve_price, PriceSource, YahooFinance};
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// How the calculator gets its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Prompt for the transactions and the price.
    Interactive,
    /// Read everything from flags.
    Batch,
}

/// Output format for batch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON with exact amounts.
    Json,
}

/// Compute FIFO cost basis and unrealized gain/loss.
#[derive(Parser, Debug)]
#[command(name = "fifo-calc", about = "Compute FIFO cost basis and unrealized gain/loss")]
pub struct Args {
    /// Input mode (defaults to batch when an input file is given).
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// JSON file of signed-share records or a request body.
    #[arg(long, value_name = "PATH", conflicts_with = "csv")]
    pub json: Option<PathBuf>,

    /// CSV file of typed buy/sell rows.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Instrument symbol, used when the input does not name one.
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Current market price; fetched live when omitted.
    #[arg(short, long, allow_hyphen_values = true)]
    pub price: Option<Decimal>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Seconds to wait for a live price.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Show verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The mode to run in once defaults are applied.
    pub const fn effective_mode(&self) -> Mode {
        match self.mode {
            Some(mode) => mode,
            None if self.json.is_some() || self.csv.is_some() => Mode::Batch,
            None => Mode::Interactive,
        }
    }
}

/// Main entry point for the calculator.
pub fn main() -> ExitCode {
    let args = Args::parse();
    super::init_tracing(args.verbose);

    let source = YahooFinance::with_timeout(Duration::from_secs(args.timeout));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match args.effective_mode() {
        Mode::Batch => run_batch(&args, &source, &mut out),
        Mode::Interactive => match Readline::new() {
            Ok(mut prompt) => {
                let result = run_interactive(&mut prompt, &source, &mut out);
                prompt.save_history();
                result
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Run in batch mode.
pub fn run_batch<W: Write>(args: &Args, source: &dyn PriceSource, out: &mut W) -> Result<()> {
    let (batch, tabular) = if let Some(path) = &args.json {
        let batch = parse_input_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        (batch, false)
    } else if let Some(path) = &args.csv {
        let mut config = CsvConfig::builder();
        if let Some(symbol) = &args.symbol {
            config = config.symbol(symbol.clone());
        }
        let batch = CsvImporter::new(config.build())
            .extract_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        (batch, true)
    } else {
        bail!("batch mode needs --json or --csv");
    };

    let symbol = batch.symbol.clone().or_else(|| args.symbol.clone());
    let (valuation, summary) = calculate(
        &batch,
        symbol.as_deref(),
        args.price.or(batch.current_price),
        source,
    )?;

    match args.format {
        OutputFormat::Text => {
            if tabular {
                report::write_sales(out, &summary)?;
            }
            report::write_valuation(out, &valuation)?;
        }
        OutputFormat::Json => report::write_json(
            out,
            &BatchReport {
                valuation: &valuation,
                sales: tabular.then_some(&summary),
            },
        )?,
    }

    Ok(())
}

/// Replay a batch and value what is left.
///
/// Transactions are replayed before any price lookup, so a bad record is
/// reported without touching the network.
pub fn calculate(
    batch: &Batch,
    symbol: Option<&str>,
    manual_price: Option<Decimal>,
    source: &dyn PriceSource,
) -> Result<(Valuation, ReplaySummary)> {
    let mut ledger = symbol.map_or_else(|| batch.ledger(), Ledger::new);
    log_records(&batch.records);

    let summary = ledger
        .replay(&batch.records)
        .context("failed to replay transactions")?;

    let price = resolve_price(manual_price, symbol, source)
        .context("failed to determine the current price")?;
    let valuation = ledger.valuation(price)?;

    tracing::info!(
        symbol = ledger.symbol(),
        lots = ledger.len(),
        %price,
        gain_loss = %valuation.gain_loss,
        "valued inventory"
    );

    Ok((valuation, summary))
}

fn log_records(records: &[TransactionRecord]) {
    for (index, record) in records.iter().enumerate() {
        tracing::debug!(
            index,
            kind = %record.kind,
            quantity = %record.quantity,
            price = ?record.unit_price,
            "transaction"
        );
    }
}

/// Source of interactive answers.
pub trait Prompt {
    /// Ask a question; `None` when the user closed the input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Prompt backed by a line editor with persistent history.
pub struct Readline {
    editor: DefaultEditor,
}

impl Readline {
    /// Create the editor and load any saved history.
    pub fn new() -> Result<Self> {
        let mut editor = DefaultEditor::new().context("failed to start line editor")?;
        if let Some(path) = history_path() {
            let _ = editor.load_history(&path);
        }
        Ok(Self { editor })
    }

    /// Persist the history, ignoring failures.
    pub fn save_history(&mut self) {
        if let Some(path) = history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(&path);
        }
    }
}

impl Prompt for Readline {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Get the history file path.
fn history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fifoledger").join("history"))
}

/// Run an interactive session.
///
/// Input problems end the session with a message rather than an error;
/// only I/O failures on `out` or the prompt itself are returned.
pub fn run_interactive<P: Prompt, W: Write>(
    prompt: &mut P,
    source: &dyn PriceSource,
    out: &mut W,
) -> Result<()> {
    let Some(choice) = prompt.ask("Input source (file/direct): ")? else {
        return Ok(());
    };

    let loaded = match choice.trim().to_lowercase().as_str() {
        "file" => {
            let Some(path) = prompt.ask("Path to JSON file: ")? else {
                return Ok(());
            };
            parse_input_file(Path::new(path.trim()))
        }
        "direct" => {
            let Some(json) = prompt.ask("Transactions as JSON: ")? else {
                return Ok(());
            };
            parse_input(&json)
        }
        other => {
            writeln!(out, "Invalid choice '{other}'. Please enter 'file' or 'direct'.")?;
            return Ok(());
        }
    };

    let batch = match loaded {
        Ok(batch) => batch,
        Err(e) => {
            writeln!(out, "Could not read transactions: {e}")?;
            return Ok(());
        }
    };

    let Some(answer) = prompt.ask("Current price (leave blank to fetch live): ")? else {
        return Ok(());
    };
    let manual_price = match answer.trim() {
        "" => batch.current_price,
        text => match text.parse::<Decimal>() {
            Ok(price) => Some(price),
            Err(_) => {
                writeln!(out, "Invalid price '{text}'.")?;
                return Ok(());
            }
        },
    };

    match calculate(&batch, batch.symbol.as_deref(), manual_price, source) {
        Ok((valuation, _)) => report::write_valuation(out, &valuation)?,
        Err(e) => writeln!(out, "Calculation failed: {e:#}")?,
    }

    Ok(())
}

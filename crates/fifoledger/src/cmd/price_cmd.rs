//! Price fetching command.
//!
//! Fetches current prices for instruments from Yahoo Finance.

use anyhow::{bail, Result};
use clap::Parser;
use fifoledger_price::{PriceSource, YahooFinance};
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

/// Fetch current prices for instruments.
#[derive(Parser, Debug)]
#[command(name = "fifo-price", about = "Fetch current prices for instruments")]
pub struct Args {
    /// Symbols to fetch (e.g., AAPL, MSFT, BTC-USD).
    #[arg(value_name = "SYMBOL", required = true)]
    pub symbols: Vec<String>,

    /// Show the trading day of each price.
    #[arg(short, long)]
    pub date: bool,

    /// Seconds to wait for each quote.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with each request.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Show verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Main entry point for the price command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    super::init_tracing(args.verbose);

    let mut source = YahooFinance::with_timeout(Duration::from_secs(args.timeout));
    if let Some(user_agent) = &args.user_agent {
        source = source.user_agent(user_agent.clone());
    }

    let stdout = io::stdout();
    match run(&args, &source, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Run the price command.
///
/// Every symbol is attempted; failures are reported on stderr and turn the
/// whole run into an error once all symbols were tried.
pub fn run<W: Write>(args: &Args, source: &dyn PriceSource, out: &mut W) -> Result<()> {
    let mut failed = 0;

    for symbol in &args.symbols {
        match source.fetch_price(symbol) {
            Ok(quote) => match (args.date, quote.as_of) {
                (true, Some(day)) => writeln!(out, "{}: {} ({day})", quote.symbol, quote.price)?,
                _ => writeln!(out, "{}: {}", quote.symbol, quote.price)?,
            },
            Err(e) => {
                eprintln!("{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} prices could not be fetched", args.symbols.len());
    }
    Ok(())
}

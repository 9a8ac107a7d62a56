//! FIFO cost basis command-line tools.
//!
//! This crate provides the command-line front ends of fifoledger:
//!
//! - `fifo-calc`: Replay buys and sells and value what is left, either
//!   interactively or from a JSON/CSV file
//! - `fifo-price`: Look up current prices
//!
//! # Example Usage
//!
//! ```bash
//! fifo-calc --json trades.json --price 160
//! fifo-calc --csv trades.csv --symbol XYZ --format json
//! fifo-price AAPL MSFT
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod report;

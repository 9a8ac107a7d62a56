//! fifo-price - Fetch current prices for instruments.

fn main() -> std::process::ExitCode {
    fifoledger::cmd::price_cmd::main()
}

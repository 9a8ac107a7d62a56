//! fifo-calc - FIFO cost basis and unrealized gain/loss.

fn main() -> std::process::ExitCode {
    fifoledger::cmd::calc::main()
}

//! HTTP service computing FIFO cost basis and unrealized gain/loss.

mod handlers;
mod models;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use fifoledger_price::YahooFinance;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::handlers::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Seconds to wait for a live price
    #[arg(long, default_value_t = 10)]
    price_timeout: u64,

    /// User-Agent header sent to the price source
    #[arg(long)]
    user_agent: Option<String>,
}

/// Build the router.
fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calculate_fifo", post(handlers::calculate_fifo))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fifoledger_web=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let price_timeout = Duration::from_secs(args.price_timeout);
    let mut source = YahooFinance::with_timeout(price_timeout);
    if let Some(user_agent) = args.user_agent {
        source = source.user_agent(user_agent);
    }

    let state = Arc::new(AppState {
        source: Arc::new(source),
        price_timeout,
    });

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["fifoledger-web"]);
        assert_eq!(args.port, 8000);
        assert_eq!(args.price_timeout, 10);
        assert_eq!(args.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "fifoledger-web",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--price-timeout",
            "3",
        ]);
        assert_eq!(args.port, 9000);
        assert_eq!(args.price_timeout, 3);
        assert!(args.host.is_unspecified());
    }
}

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fifoledger_core::LedgerError;
use fifoledger_importer::json::CalculateRequest;
use fifoledger_importer::ImportError;
use fifoledger_price::{resolve_price, PriceSource};
use rust_decimal::Decimal;
use serde_json::json;

use crate::models::CalculateResponse;

/// Shared application state
pub struct AppState {
    /// Where live prices come from.
    pub source: Arc<dyn PriceSource>,
    /// Longest wait for a live price before giving up.
    pub price_timeout: Duration,
}

/// Error response carrying a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        let status = if error.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::BAD_REQUEST
        };
        Self {
            status,
            detail: error.to_string(),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(error: ImportError) -> Self {
        Self::bad_request(error.to_string())
    }
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// Replay the posted transactions and value what is left.
///
/// Every request gets its own ledger; nothing is kept between requests.
pub async fn calculate_fifo(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CalculateResponse>, ApiError> {
    let request: CalculateRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid request body: {e}")))?;
    let batch = request.into_batch()?;

    tracing::info!(
        symbol = batch.symbol.as_deref().unwrap_or("-"),
        transactions = batch.records.len(),
        manual_price = batch.current_price.is_some(),
        "calculate_fifo"
    );

    let mut ledger = batch.ledger();
    let summary = ledger
        .replay(&batch.records)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    tracing::debug!(
        sales = summary.sales.len(),
        cost_of_sales = %summary.total_cost_of_sales,
        "replayed transactions"
    );

    let price = match (batch.current_price, batch.symbol) {
        (Some(price), symbol) => {
            resolve_price(Some(price), symbol.as_deref(), state.source.as_ref())?
        }
        (None, Some(symbol)) => fetch_live_price(&state, symbol).await?,
        (None, None) => {
            return Err(ApiError::bad_request(
                "no stock name in the transactions and no current_price given",
            ))
        }
    };

    let valuation = ledger.valuation(price)?;
    Ok(Json(valuation.into()))
}

/// Look up a live price on the blocking pool, bounded by the configured timeout.
async fn fetch_live_price(state: &AppState, symbol: String) -> Result<Decimal, ApiError> {
    let source = Arc::clone(&state.source);
    let lookup = {
        let symbol = symbol.clone();
        tokio::task::spawn_blocking(move || resolve_price(None, Some(&symbol), source.as_ref()))
    };

    match tokio::time::timeout(state.price_timeout, lookup).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(join_error)) => {
            tracing::error!(%symbol, "price lookup task failed: {join_error}");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: "price lookup failed".to_string(),
            })
        }
        Err(_) => {
            tracing::warn!(%symbol, timeout = ?state.price_timeout, "price lookup timed out");
            Err(ApiError {
                status: StatusCode::GATEWAY_TIMEOUT,
                detail: format!("timed out fetching the price of {symbol}"),
            })
        }
    }
}

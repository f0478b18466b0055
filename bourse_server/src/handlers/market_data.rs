//! Live quote relay.
//!
//! Whitelisted symbols are fetched from the live provider in batches of
//! `BATCH_SIZE`: one batch runs concurrently, and a fixed pause separates
//! consecutive batches to stay under the provider's rate limit. A symbol that
//! cannot be fetched is reported in `errors` and never fails the request.
use std::time::Duration;

use axum::{Json, body::Bytes, extract::State};
use bourse_common::tickers::LiveTicker;
use bourse_common::wire::MarketDataResponse;
use futures::future::join_all;
use log::{info, warn};
use serde_json::Value;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::handlers::json_body;
use crate::providers::QuoteProvider;
use crate::state::AppState;

/// Upper bound on the raw `symbols` list.
pub const MAX_SYMBOLS: usize = 50;
/// Symbols fetched concurrently.
pub const BATCH_SIZE: usize = 5;
/// Pause between two batches.
pub const BATCH_PAUSE: Duration = Duration::from_millis(200);

pub async fn market_data(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Bytes,
) -> Result<Json<MarketDataResponse>, AppError> {
    let payload = json_body(&body);

    let requested = match payload.get("symbols") {
        Some(Value::Array(list)) if !list.is_empty() => list,
        _ => return Err(AppError::BadRequest("Symbols array is required".into())),
    };
    if requested.len() > MAX_SYMBOLS {
        return Err(AppError::BadRequest(format!(
            "Maximum {} symbols allowed per request",
            MAX_SYMBOLS
        )));
    }

    let tickers: Vec<LiveTicker> = requested
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|s| s.to_uppercase().parse().ok())
        .collect();
    if tickers.is_empty() {
        return Err(AppError::BadRequest("No valid symbols provided".into()));
    }

    let provider = state
        .quotes
        .clone()
        .ok_or_else(|| AppError::Configuration("FINNHUB_API_KEY not configured".into()))?;

    info!("Fetching {} live quotes for user {}", tickers.len(), user.id);
    let response = fetch_in_batches(provider.as_ref(), &tickers).await;
    info!(
        "Live quotes fetched: {} ok, {} failed",
        response.quotes.len(),
        response.errors.len()
    );
    Ok(Json(response))
}

/// Fetches every ticker, keeping request order in both result lists.
async fn fetch_in_batches(provider: &dyn QuoteProvider, tickers: &[LiveTicker]) -> MarketDataResponse {
    let mut response = MarketDataResponse::default();

    for (index, batch) in tickers.chunks(BATCH_SIZE).enumerate() {
        if index > 0 {
            tokio::time::sleep(BATCH_PAUSE).await;
        }
        let results = join_all(batch.iter().map(|ticker| provider.quote(*ticker))).await;
        for (ticker, result) in batch.iter().zip(results) {
            match result {
                Ok(quote) => response.quotes.push(quote),
                Err(e) => {
                    warn!("Error fetching {}: {}", ticker, e);
                    response.errors.push(ticker.to_string());
                }
            }
        }
    }
    response
}

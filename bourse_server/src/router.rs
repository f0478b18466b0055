use std::time::Instant;

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use bourse_common::net::BOURSE_ROUTE;
use log::info;
use tower_http::cors::CorsLayer;

use crate::handlers::{bourse, crypto, health, market_data, payments, paypal};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_check))
        .route(BOURSE_ROUTE, post(bourse::casablanca_bourse))
        .route("/market-data", post(market_data::market_data))
        .route("/create-checkout", post(payments::create_checkout))
        .route("/verify-payment", post(payments::verify_payment))
        .route("/create-crypto-checkout", post(crypto::create_crypto_checkout))
        .route("/create-paypal-order", post(paypal::create_paypal_order))
        .route("/capture-paypal-order", post(paypal::capture_paypal_order))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Logs method, path, status and latency of every request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

//! Route handlers.
//!
//! - `health`: liveness check.
//! - `bourse`: simulated Casablanca quotes.
//! - `market_data`: live quote relay.
//! - `payments`: card checkout creation and verification.
//! - `crypto`: hosted crypto charges.
//! - `paypal`: order creation and capture.
use axum::body::Bytes;
use axum::http::{HeaderMap, header::ORIGIN};
use serde_json::Value;

pub mod bourse;
pub mod crypto;
pub mod health;
pub mod market_data;
pub mod payments;
pub mod paypal;

/// Reads a request body as JSON; an empty or malformed body reads as `null`.
pub(crate) fn json_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// String field of a JSON object, ignoring empty strings.
pub(crate) fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// `Origin` header used as the prefix of return URLs; empty when absent.
pub(crate) fn origin(headers: &HeaderMap) -> &str {
    headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

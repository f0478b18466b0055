//! Simulated Casablanca bourse quotes.
//!
//! No authentication and no upstream call: the symbols are filtered against the
//! registry and every survivor is priced by the deterministic simulator, all at
//! the same instant.
use axum::{Json, body::Bytes, extract::State};
use bourse_common::registry::DEFAULT_SYMBOLS;
use bourse_common::simulate;
use bourse_common::wire::BourseResponse;
use log::info;
use serde_json::Value;

use crate::error::AppError;
use crate::handlers::json_body;
use crate::state::AppState;

pub async fn casablanca_bourse(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BourseResponse>, AppError> {
    let payload = json_body(&body);

    let requested: Vec<Value> = match payload.get("symbols") {
        None => DEFAULT_SYMBOLS
            .iter()
            .map(|s| Value::String(s.to_string()))
            .collect(),
        Some(Value::Array(list)) if !list.is_empty() => list.clone(),
        Some(_) => return Err(AppError::BadRequest("Symbols array is required".into())),
    };

    let symbols = state
        .registry
        .filter_known(requested.iter().filter_map(Value::as_str));
    if symbols.is_empty() {
        return Err(AppError::BadRequest(
            "No valid Moroccan stock symbols provided".into(),
        ));
    }

    info!("Simulating Casablanca quotes for {:?}", symbols);
    let now = state.now();
    let quotes = symbols
        .iter()
        .map(|symbol| simulate(symbol, now, &state.registry))
        .collect();

    Ok(Json(BourseResponse::new(quotes, now)))
}

#[cfg(test)]
mod tests {
    use crate::router::create_router;
    use crate::testkit::{fixed_state, post_json};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn default_symbols_when_none_requested() {
        let app = create_router(fixed_state());
        let (status, body) = post_json(app, "/casablanca-bourse", None, "{}").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["source"], "casablanca-bourse-simulated");
        assert_eq!(body["timestamp"], "2025-03-14T10:30:00");
        let symbols: Vec<&str> = body["quotes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["symbol"].as_str().unwrap())
            .collect();
        assert_eq!(symbols, ["IAM", "ATW", "BCP", "LHM", "CIH", "TQM"]);
    }

    #[tokio::test]
    async fn empty_body_counts_as_empty_object() {
        let app = create_router(fixed_state());
        let (status, body) = post_json(app, "/casablanca-bourse", None, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quotes"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn requested_symbols_are_uppercased_and_filtered() {
        let app = create_router(fixed_state());
        let request = json!({"symbols": ["iam", "AAPL", 7, "hps"]}).to_string();
        let (status, body) = post_json(app, "/casablanca-bourse", None, &request).await;

        assert_eq!(status, StatusCode::OK);
        let quotes = body["quotes"].as_array().unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0]["symbol"], "IAM");
        assert_eq!(quotes[0]["name"], "Maroc Telecom");
        assert_eq!(quotes[0]["price"], 112.28);
        assert_eq!(quotes[0]["change"], 0.58);
        assert_eq!(quotes[0]["changePercent"], 0.52);
        assert_eq!(quotes[0]["lastUpdate"], "2025-03-14T10:30:00");
        assert_eq!(quotes[1]["symbol"], "HPS");
    }

    #[tokio::test]
    async fn non_list_symbols_are_rejected() {
        for request in [r#"{"symbols":"IAM"}"#, r#"{"symbols":[]}"#, r#"{"symbols":null}"#] {
            let app = create_router(fixed_state());
            let (status, body) = post_json(app, "/casablanca-bourse", None, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{request}");
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Symbols array is required");
        }
    }

    #[tokio::test]
    async fn unknown_symbols_only_is_rejected() {
        let app = create_router(fixed_state());
        let (status, body) =
            post_json(app, "/casablanca-bourse", None, r#"{"symbols":["ZZZ","AAPL"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No valid Moroccan stock symbols provided");
    }
}

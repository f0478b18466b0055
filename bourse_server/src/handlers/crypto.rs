//! Challenge checkout paid in crypto through a hosted charge page.
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use log::{error, info};
use serde::Serialize;
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::handlers::{json_body, origin, str_field};
use crate::model::plans::ChallengePlan;
use crate::providers::ChargeRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CryptoCheckoutResponse {
    pub url: String,
    pub charge_id: String,
}

/// `5000` as `5,000`.
fn with_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

pub async fn create_crypto_checkout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CryptoCheckoutResponse>, AppError> {
    let payload = json_body(&body);

    let plan: ChallengePlan = str_field(&payload, "plan")
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid plan selected".into()))?;

    let crypto = state
        .crypto
        .clone()
        .ok_or_else(|| AppError::Configuration("Crypto payments not configured".into()))?;

    let terms = plan.terms();
    let origin = origin(&headers);
    let request = ChargeRequest {
        name: terms.display_name.to_string(),
        description: format!(
            "Trading Challenge - Capital: ${}",
            with_thousands(terms.initial_balance)
        ),
        amount_usd: terms.price_usd,
        metadata: json!({
            "user_id": user.id,
            "plan": plan,
            "initial_balance": terms.initial_balance,
            "profit_target": terms.profit_target_percent,
            "max_daily_loss": terms.max_daily_loss_percent,
            "max_total_loss": terms.max_total_loss_percent,
        }),
        redirect_url: format!("{}/payment-success?provider=crypto", origin),
        cancel_url: format!("{}/payment-cancelled", origin),
    };

    let charge = crypto.create_charge(&request).await.map_err(|e| {
        error!("Crypto charge for user {} failed: {}", user.id, e);
        AppError::Upstream("Failed to create crypto checkout".into())
    })?;
    let url = charge
        .hosted_url
        .ok_or_else(|| AppError::Upstream("Invalid response from payment provider".into()))?;

    info!("Crypto charge {} created for user {} ({})", charge.id, user.id, plan);
    Ok(Json(CryptoCheckoutResponse {
        url,
        charge_id: charge.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::create_router;
    use crate::testkit::{FakeCrypto, authed_state, post_json, post_json_with_origin};
    use axum::http::StatusCode;
    use std::sync::Arc;

    const TOKEN: Option<&str> = Some("Bearer good-token");

    #[test]
    fn thousands_separator() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(5_000), "5,000");
        assert_eq!(with_thousands(100_000), "100,000");
        assert_eq!(with_thousands(1_250_000), "1,250,000");
    }

    #[tokio::test]
    async fn charge_carries_plan_terms() {
        let crypto = Arc::new(FakeCrypto::default());
        let state = authed_state().with_crypto(crypto.clone());

        let (status, body) = post_json_with_origin(
            create_router(state),
            "/create-crypto-checkout",
            TOKEN,
            "https://app.example",
            r#"{"plan":"elite"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://commerce.example/ch_1");
        assert_eq!(body["charge_id"], "ch_1");

        let charge = crypto.last_charge().unwrap();
        assert_eq!(charge.name, "Elite Challenge");
        assert_eq!(charge.description, "Trading Challenge - Capital: $100,000");
        assert_eq!(charge.amount_usd, 499);
        assert_eq!(charge.metadata["user_id"], "user-1");
        assert_eq!(charge.metadata["plan"], "elite");
        assert_eq!(charge.metadata["profit_target"], 8);
        assert_eq!(charge.redirect_url, "https://app.example/payment-success?provider=crypto");
        assert_eq!(charge.cancel_url, "https://app.example/payment-cancelled");
    }

    #[tokio::test]
    async fn crypto_checkout_errors() {
        let state = authed_state().with_crypto(Arc::new(FakeCrypto::default()));
        let (status, body) = post_json(
            create_router(state),
            "/create-crypto-checkout",
            TOKEN,
            r#"{"plan":"platinum"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid plan selected");

        let (status, body) = post_json(
            create_router(authed_state()),
            "/create-crypto-checkout",
            TOKEN,
            r#"{"plan":"pro"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Crypto payments not configured");

        let state = authed_state().with_crypto(Arc::new(FakeCrypto::without_page()));
        let (status, body) = post_json(
            create_router(state),
            "/create-crypto-checkout",
            TOKEN,
            r#"{"plan":"pro"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Invalid response from payment provider");
    }

    #[tokio::test]
    async fn crypto_checkout_requires_authentication() {
        let state = authed_state().with_crypto(Arc::new(FakeCrypto::default()));
        let (status, _) =
            post_json(create_router(state), "/create-crypto-checkout", None, r#"{"plan":"pro"}"#)
                .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

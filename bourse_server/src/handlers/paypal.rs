//! Challenge checkout through an approve-then-capture order.
//!
//! `create_paypal_order` opens an order carrying the plan terms in its
//! `custom_id`; `capture_paypal_order` captures it after approval and
//! provisions the challenge. An order already on record is not captured again.
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use log::{info, warn};
use serde::Serialize;
use serde_json::{Value, json};

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::handlers::payments::VerifyPaymentResponse;
use crate::handlers::{json_body, origin, str_field};
use crate::model::challenge::{NewChallenge, NewPayment};
use crate::model::plans::ChallengePlan;
use crate::providers::OrderRequest;
use crate::state::AppState;

const MAX_ORDER_ID_LEN: usize = 100;

#[derive(Debug, Serialize)]
pub struct PayPalOrderResponse {
    pub url: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
}

/// `pro` as `Pro`.
fn capitalized(plan: ChallengePlan) -> String {
    let name = plan.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

/// Plan named in an order's `custom_id`, when it is JSON with a known plan.
fn plan_from_custom_id(custom_id: &str) -> Option<ChallengePlan> {
    let parsed: Value = serde_json::from_str(custom_id).ok()?;
    parsed.get("plan")?.as_str()?.parse().ok()
}

pub async fn create_paypal_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PayPalOrderResponse>, AppError> {
    let payload = json_body(&body);

    let plan: ChallengePlan = str_field(&payload, "plan")
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| {
            AppError::BadRequest("Invalid plan selected. Valid plans: starter, pro, elite".into())
        })?;

    if user.email.as_deref().is_none_or(str::is_empty) {
        return Err(AppError::Unauthorized("User not authenticated".into()));
    }

    let orders = state
        .orders
        .clone()
        .ok_or_else(|| AppError::Configuration("PayPal credentials not configured".into()))?;

    let terms = plan.terms();
    let origin = origin(&headers);
    let custom_id = json!({
        "user_id": user.id,
        "plan": plan,
        "initial_balance": terms.initial_balance,
        "profit_target_percent": terms.profit_target_percent,
        "max_daily_loss_percent": terms.max_daily_loss_percent,
        "max_total_loss_percent": terms.max_total_loss_percent,
    });
    let request = OrderRequest {
        amount_usd: terms.price_usd,
        description: format!("TradeSense AI - Challenge {}", capitalized(plan)),
        custom_id: custom_id.to_string(),
        return_url: format!("{}/payment-success?provider=paypal&plan={}", origin, plan),
        cancel_url: format!("{}/payment-cancelled", origin),
    };

    let order = orders.create_order(&request).await?;
    let url = order
        .approval_url
        .ok_or_else(|| AppError::Upstream("PayPal approval URL not found".into()))?;

    info!("PayPal order {} created for user {} ({})", order.id, user.id, plan);
    Ok(Json(PayPalOrderResponse {
        url,
        order_id: order.id,
    }))
}

pub async fn capture_paypal_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Bytes,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let payload = json_body(&body);

    let order_id = str_field(&payload, "orderId")
        .filter(|id| id.chars().count() <= MAX_ORDER_ID_LEN)
        .ok_or_else(|| AppError::BadRequest("Invalid order ID".into()))?;

    let store = state
        .store
        .clone()
        .ok_or_else(|| AppError::Configuration("Configuration error".into()))?;
    let orders = state
        .orders
        .clone()
        .ok_or_else(|| AppError::Configuration("PayPal credentials not configured".into()))?;

    if let Some(challenge_id) = store.find_payment_challenge(order_id).await? {
        info!("Order {} already provisioned challenge {}", order_id, challenge_id);
        return Ok(Json(VerifyPaymentResponse::already_created(challenge_id)));
    }

    let captured = orders
        .capture_order(order_id)
        .await
        .map_err(|e| AppError::Upstream(format!("Payment capture failed: {}", e)))?;
    if captured.status != "COMPLETED" {
        warn!("Order {} captured with status '{}'", order_id, captured.status);
        return Err(AppError::Upstream(format!(
            "Payment capture failed: {}",
            captured.status
        )));
    }

    let plan = captured
        .custom_id
        .as_deref()
        .and_then(plan_from_custom_id)
        .or_else(|| str_field(&payload, "plan").and_then(|name| name.parse().ok()))
        .unwrap_or(ChallengePlan::Starter);

    let challenge = NewChallenge::new(&user.id, plan, state.now());
    let challenge_id = store
        .insert_challenge(&challenge)
        .await?
        .ok_or_else(|| AppError::Upstream("Failed to create challenge record".into()))?;

    let payment = NewPayment::from_capture(&user.id, &challenge_id, order_id, &captured);
    store.insert_payment(&payment).await?;

    info!("Challenge {} ({}) provisioned for user {} from order {}", challenge_id, plan, user.id, order_id);
    Ok(Json(VerifyPaymentResponse::provisioned(challenge_id, &challenge)))
}

//! One-shot checkout of a challenge plan.
//!
//! `create_checkout` opens a payment session for the authenticated user;
//! `verify_payment` is called back once the user returns from the processor and
//! provisions the challenge when the session is paid. A session whose payment
//! is already on record answers with the existing challenge instead.
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use log::info;
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::handlers::{json_body, origin, str_field};
use crate::model::challenge::{NewChallenge, NewPayment};
use crate::model::plans::ChallengePlan;
use crate::providers::CheckoutRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Longest session id accepted from the client.
const MAX_SESSION_ID_LEN: usize = 500;

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub challenge_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<ChallengePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub already_created: bool,
}

impl VerifyPaymentResponse {
    pub fn provisioned(challenge_id: String, challenge: &NewChallenge) -> Self {
        Self {
            success: true,
            challenge_id,
            plan: Some(challenge.plan),
            initial_balance: Some(challenge.initial_balance),
            already_created: false,
        }
    }

    pub fn already_created(challenge_id: String) -> Self {
        Self {
            success: true,
            challenge_id,
            plan: None,
            initial_balance: None,
            already_created: true,
        }
    }
}

pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckoutResponse>, AppError> {
    let payload = json_body(&body);

    let plan: ChallengePlan = str_field(&payload, "plan")
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid plan selected".into()))?;

    let email = user
        .email
        .as_deref()
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::BadRequest("User email required".into()))?;

    let payments = state
        .payments
        .clone()
        .ok_or_else(|| AppError::Configuration("Stripe configuration missing".into()))?;

    let customer_id = match payments.find_customer(email).await? {
        Some(id) => id,
        None => payments.create_customer(email, &user.id).await?,
    };

    let origin = origin(&headers);
    let request = CheckoutRequest {
        customer_id,
        price_id: plan.terms().price_id.to_string(),
        success_url: format!("{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}", origin),
        cancel_url: format!("{}/payment-cancelled", origin),
        metadata: vec![
            ("user_id".to_string(), user.id.clone()),
            ("plan".to_string(), plan.to_string()),
            ("challenge_type".to_string(), "standard".to_string()),
        ],
    };
    let session = payments.create_checkout_session(&request).await?;
    let url = session
        .url
        .ok_or_else(|| AppError::Upstream("Checkout session has no URL".into()))?;

    info!("Checkout session {} created for user {} ({})", session.id, user.id, plan);
    Ok(Json(CheckoutResponse { url }))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Bytes,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let payload = json_body(&body);

    let session_id = str_field(&payload, "session_id")
        .filter(|id| id.chars().count() <= MAX_SESSION_ID_LEN)
        .ok_or_else(|| AppError::BadRequest("Invalid session ID".into()))?;

    let store = state
        .store
        .clone()
        .ok_or_else(|| AppError::Configuration("Configuration error".into()))?;
    let payments = state
        .payments
        .clone()
        .ok_or_else(|| AppError::Configuration("Stripe config missing".into()))?;

    let session = payments.retrieve_session(session_id).await?;
    if session.payment_status != "paid" {
        return Err(AppError::BadRequest("Payment not completed".into()));
    }

    if let Some(payment_id) = session.payment_intent.as_deref() {
        if let Some(challenge_id) = store.find_payment_challenge(payment_id).await? {
            info!("Payment {} already provisioned challenge {}", payment_id, challenge_id);
            return Ok(Json(VerifyPaymentResponse::already_created(challenge_id)));
        }
    }

    let plan: ChallengePlan = str_field(&payload, "plan")
        .or_else(|| session.metadata.get("plan").map(String::as_str))
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid plan".into()))?;

    let challenge = NewChallenge::new(&user.id, plan, state.now());
    let challenge_id = store
        .insert_challenge(&challenge)
        .await?
        .ok_or_else(|| AppError::Upstream("Failed to create challenge record".into()))?;

    let payment = NewPayment::from_session(&user.id, &challenge_id, &session);
    store.insert_payment(&payment).await?;

    info!("Challenge {} ({}) provisioned for user {}", challenge_id, plan, user.id);
    Ok(Json(VerifyPaymentResponse::provisioned(challenge_id, &challenge)))
}

//! Records written once a checkout is verified as paid.
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::plans::ChallengePlan;
use crate::providers::{CapturedOrder, CheckoutSession};

/// Largest captured amount taken at face value.
const MAX_CAPTURE_AMOUNT: f64 = 1_000_000.0;

/// Challenge account provisioned for a paid plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewChallenge {
    pub user_id: String,
    pub plan: ChallengePlan,
    pub status: &'static str,
    pub initial_balance: u32,
    pub current_balance: u32,
    pub profit_target_percent: u32,
    pub max_daily_loss_percent: u32,
    pub max_total_loss_percent: u32,
    pub start_date: NaiveDateTime,
}

impl NewChallenge {
    /// Active challenge starting at `start_date` with the plan's full balance.
    pub fn new(user_id: &str, plan: ChallengePlan, start_date: NaiveDateTime) -> Self {
        let terms = plan.terms();
        Self {
            user_id: user_id.to_string(),
            plan,
            status: "active",
            initial_balance: terms.initial_balance,
            current_balance: terms.initial_balance,
            profit_target_percent: terms.profit_target_percent,
            max_daily_loss_percent: terms.max_daily_loss_percent,
            max_total_loss_percent: terms.max_total_loss_percent,
            start_date,
        }
    }
}

/// Completed payment linked to a challenge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPayment {
    pub user_id: String,
    pub challenge_id: String,
    /// Major currency units.
    pub amount: f64,
    pub currency: Option<String>,
    pub payment_status: &'static str,
    pub stripe_payment_id: Option<String>,
    pub payment_method: &'static str,
}

impl NewPayment {
    pub fn from_session(user_id: &str, challenge_id: &str, session: &CheckoutSession) -> Self {
        Self {
            user_id: user_id.to_string(),
            challenge_id: challenge_id.to_string(),
            amount: session.amount_total.unwrap_or(0) as f64 / 100.0,
            currency: session.currency.clone(),
            payment_status: "completed",
            stripe_payment_id: session.payment_intent.clone(),
            payment_method: "stripe",
        }
    }

    /// Payment for a captured order. The order id stands in for the processor
    /// payment id; an amount that is missing or out of range is recorded as 0.
    pub fn from_capture(
        user_id: &str,
        challenge_id: &str,
        order_id: &str,
        captured: &CapturedOrder,
    ) -> Self {
        let amount = captured
            .amount
            .as_deref()
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| (0.0..=MAX_CAPTURE_AMOUNT).contains(value))
            .unwrap_or(0.0);
        let currency = captured
            .currency
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or("USD")
            .chars()
            .take(3)
            .collect::<String>()
            .to_uppercase();

        Self {
            user_id: user_id.to_string(),
            challenge_id: challenge_id.to_string(),
            amount,
            currency: Some(currency),
            payment_status: "paid",
            stripe_payment_id: Some(order_id.to_string()),
            payment_method: "paypal",
        }
    }
}

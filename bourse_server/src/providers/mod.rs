//! External collaborators of the server.
//!
//! Every collaborator sits behind a trait so handlers never talk HTTP to a
//! third party directly, and tests can swap in in-memory fakes:
//! - `IdentityProvider`: bearer-token verification (`identity`).
//! - `QuoteProvider`: live quotes for whitelisted tickers (`finnhub`).
//! - `PaymentProcessor`: customers and checkout sessions (`stripe`).
//! - `CryptoCheckout`: hosted crypto charges (`coinbase`).
//! - `OrderProcessor`: approve-then-capture orders (`paypal`).
//! - `ChallengeStore`: challenge and payment records (`store`).
use std::collections::HashMap;

use async_trait::async_trait;
use bourse_common::tickers::LiveTicker;
use bourse_common::wire::LiveQuote;
use reqwest::Response;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::challenge::{NewChallenge, NewPayment};

pub mod coinbase;
pub mod finnhub;
pub mod identity;
pub mod paypal;
pub mod store;
pub mod stripe;

pub use coinbase::CoinbaseCommerceClient;
pub use finnhub::FinnhubClient;
pub use identity::SupabaseIdentity;
pub use paypal::PayPalClient;
pub use store::SupabaseStore;
pub use stripe::StripeClient;

/// Failure talking to a collaborator.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Rejected(String),
}

/// User resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Checkout session as reported by the payment processor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: String,
    /// Amount in minor units (cents).
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Parameters of a one-item, pay-once checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

/// Fixed-price crypto charge to open on a hosted page.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub name: String,
    pub description: String,
    pub amount_usd: u32,
    pub metadata: Value,
    pub redirect_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Charge {
    pub id: String,
    #[serde(default)]
    pub hosted_url: Option<String>,
}

/// One-unit order waiting for buyer approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub amount_usd: u32,
    pub description: String,
    /// Opaque reference echoed back on capture.
    pub custom_id: String,
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    /// Where the buyer approves the order.
    pub approval_url: Option<String>,
}

/// Outcome of capturing an approved order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapturedOrder {
    pub status: String,
    pub custom_id: Option<String>,
    /// Captured amount as the processor wrote it (`"99.00"`).
    pub amount: Option<String>,
    pub currency: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the user behind `token`, failing if the token is not valid.
    async fn verify(&self, token: &str) -> Result<User, ProviderError>;
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Current quote of `ticker`. A provider answer without a usable price is
    /// an error.
    async fn quote(&self, ticker: LiveTicker) -> Result<LiveQuote, ProviderError>;
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Id of the first customer registered with `email`, if any.
    async fn find_customer(&self, email: &str) -> Result<Option<String>, ProviderError>;

    /// Registers a customer linked to `user_id` and returns its id.
    async fn create_customer(&self, email: &str, user_id: &str) -> Result<String, ProviderError>;

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError>;

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError>;
}

#[async_trait]
pub trait CryptoCheckout: Send + Sync {
    async fn create_charge(&self, request: &ChargeRequest) -> Result<Charge, ProviderError>;
}

#[async_trait]
pub trait OrderProcessor: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, ProviderError>;

    async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder, ProviderError>;
}

#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Challenge already provisioned for the processor payment `payment_id`.
    async fn find_payment_challenge(&self, payment_id: &str)
    -> Result<Option<String>, ProviderError>;

    /// Inserts a challenge and returns its id when the store reports one.
    async fn insert_challenge(&self, challenge: &NewChallenge)
    -> Result<Option<String>, ProviderError>;

    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), ProviderError>;
}

/// Turns a non-2xx response into `ProviderError::Status`, keeping the body text.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}

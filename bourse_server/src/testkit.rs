//! In-memory collaborators and request helpers for router tests.
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use bourse_common::SymbolRegistry;
use bourse_common::tickers::LiveTicker;
use bourse_common::wire::LiveQuote;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::model::challenge::{NewChallenge, NewPayment};
use crate::providers::{
    CapturedOrder, ChallengeStore, Charge, ChargeRequest, CheckoutRequest, CheckoutSession,
    CryptoCheckout, IdentityProvider, Order, OrderProcessor, OrderRequest, PaymentProcessor,
    ProviderError, QuoteProvider, User,
};
use crate::state::AppState;

/// 2025-03-14 10:30:00, minute of day 630.
pub fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

/// Built-in registry, fixed clock, no collaborators.
pub fn fixed_state() -> AppState {
    AppState::new(SymbolRegistry::casablanca().unwrap()).with_clock(fixed_clock)
}

/// `fixed_state` plus the fake identity provider.
pub fn authed_state() -> AppState {
    fixed_state().with_identity(Arc::new(FakeIdentity))
}

pub async fn post_json(
    app: Router,
    path: &str,
    authorization: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    send(app, path, authorization, None, body).await
}

pub async fn post_json_with_origin(
    app: Router,
    path: &str,
    authorization: Option<&str>,
    origin: &str,
    body: &str,
) -> (StatusCode, Value) {
    send(app, path, authorization, Some(origin), body).await
}

async fn send(
    app: Router,
    path: &str,
    authorization: Option<&str>,
    origin: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }
    if let Some(value) = origin {
        request = request.header(header::ORIGIN, value);
    }
    let request = request.body(Body::from(body.to_string())).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Accepts `good-token` (with e-mail) and `no-email`.
pub struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify(&self, token: &str) -> Result<User, ProviderError> {
        match token {
            "good-token" => Ok(User {
                id: "user-1".into(),
                email: Some("trader@example.com".into()),
            }),
            "no-email" => Ok(User {
                id: "user-2".into(),
                email: None,
            }),
            _ => Err(ProviderError::Rejected("unknown token".into())),
        }
    }
}

/// Quotes every ticker at 1.0, except the ones told to fail.
#[derive(Default)]
pub struct FakeQuotes {
    failing: Vec<LiveTicker>,
    calls: AtomicUsize,
}

impl FakeQuotes {
    pub fn failing(tickers: &[LiveTicker]) -> Self {
        Self {
            failing: tickers.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for FakeQuotes {
    async fn quote(&self, ticker: LiveTicker) -> Result<LiveQuote, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&ticker) {
            return Err(ProviderError::Rejected(format!("no data for {}", ticker)));
        }
        Ok(LiveQuote {
            symbol: ticker.to_string(),
            price: 1.0,
            change: 0.0,
            change_percent: 0.0,
            high: 1.0,
            low: 1.0,
            open: 1.0,
            previous_close: 1.0,
            timestamp: 0,
        })
    }
}

/// Records customers and checkouts; every retrieved session is `session`.
pub struct FakePayments {
    customers: Mutex<Vec<(String, String)>>,
    checkouts: Mutex<Vec<CheckoutRequest>>,
    session: CheckoutSession,
}

impl Default for FakePayments {
    fn default() -> Self {
        Self {
            customers: Mutex::new(Vec::new()),
            checkouts: Mutex::new(Vec::new()),
            session: CheckoutSession {
                id: "cs_1".into(),
                url: None,
                payment_status: "unpaid".into(),
                amount_total: None,
                currency: None,
                payment_intent: None,
                metadata: Default::default(),
            },
        }
    }
}

impl FakePayments {
    /// Sessions come back paid for `amount_total` cents, tagged with `plan`.
    pub fn paid(plan: &str, amount_total: i64) -> Self {
        let mut payments = Self::default();
        payments.session.payment_status = "paid".into();
        payments.session.amount_total = Some(amount_total);
        payments.session.currency = Some("usd".into());
        payments.session.payment_intent = Some("pi_1".into());
        payments.session.metadata.insert("plan".into(), plan.into());
        payments
    }

    pub fn customers_created(&self) -> usize {
        self.customers.lock().unwrap().len()
    }

    pub fn last_checkout(&self) -> Option<CheckoutRequest> {
        self.checkouts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentProcessor for FakePayments {
    async fn find_customer(&self, email: &str) -> Result<Option<String>, ProviderError> {
        let customers = self.customers.lock().unwrap();
        Ok(customers
            .iter()
            .find(|(known, _)| known == email)
            .map(|(_, id)| id.clone()))
    }

    async fn create_customer(&self, email: &str, _user_id: &str) -> Result<String, ProviderError> {
        let mut customers = self.customers.lock().unwrap();
        let id = format!("cus_{}", customers.len() + 1);
        customers.push((email.to_string(), id.clone()));
        Ok(id)
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError> {
        self.checkouts.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            url: Some("https://checkout.example/cs_1".into()),
            ..self.session.clone()
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError> {
        Ok(CheckoutSession {
            id: session_id.to_string(),
            ..self.session.clone()
        })
    }
}

/// Keeps inserted records; ids are `challenge-<n>` unless disabled.
pub struct FakeStore {
    assign_ids: bool,
    challenges: Mutex<Vec<NewChallenge>>,
    payments: Mutex<Vec<NewPayment>>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            assign_ids: true,
            challenges: Mutex::new(Vec::new()),
            payments: Mutex::new(Vec::new()),
        }
    }
}

impl FakeStore {
    pub fn without_ids() -> Self {
        Self {
            assign_ids: false,
            ..Self::default()
        }
    }

    pub fn challenges(&self) -> Vec<NewChallenge> {
        self.challenges.lock().unwrap().clone()
    }

    pub fn payments(&self) -> Vec<NewPayment> {
        self.payments.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChallengeStore for FakeStore {
    async fn find_payment_challenge(
        &self,
        payment_id: &str,
    ) -> Result<Option<String>, ProviderError> {
        let payments = self.payments.lock().unwrap();
        Ok(payments
            .iter()
            .find(|payment| payment.stripe_payment_id.as_deref() == Some(payment_id))
            .map(|payment| payment.challenge_id.clone()))
    }

    async fn insert_challenge(
        &self,
        challenge: &NewChallenge,
    ) -> Result<Option<String>, ProviderError> {
        let mut challenges = self.challenges.lock().unwrap();
        challenges.push(challenge.clone());
        Ok(self
            .assign_ids
            .then(|| format!("challenge-{}", challenges.len())))
    }

    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), ProviderError> {
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }
}

/// Records charges; hands out a hosted page unless built with `without_page`.
#[derive(Default)]
pub struct FakeCrypto {
    without_page: bool,
    charges: Mutex<Vec<ChargeRequest>>,
}

impl FakeCrypto {
    pub fn without_page() -> Self {
        Self {
            without_page: true,
            ..Self::default()
        }
    }

    pub fn last_charge(&self) -> Option<ChargeRequest> {
        self.charges.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CryptoCheckout for FakeCrypto {
    async fn create_charge(&self, request: &ChargeRequest) -> Result<Charge, ProviderError> {
        self.charges.lock().unwrap().push(request.clone());
        Ok(Charge {
            id: "ch_1".into(),
            hosted_url: (!self.without_page).then(|| "https://commerce.example/ch_1".into()),
        })
    }
}

/// Records orders; every capture returns `captured`.
pub struct FakeOrders {
    orders: Mutex<Vec<OrderRequest>>,
    captures: AtomicUsize,
    captured: CapturedOrder,
}

impl FakeOrders {
    /// Captures come back `COMPLETED` for `amount` USD with `custom_id` attached.
    pub fn completed(custom_id: Option<&str>, amount: &str) -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            captures: AtomicUsize::new(0),
            captured: CapturedOrder {
                status: "COMPLETED".into(),
                custom_id: custom_id.map(str::to_string),
                amount: Some(amount.into()),
                currency: Some("USD".into()),
            },
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.captured.status = status.into();
        self
    }

    pub fn last_order(&self) -> Option<OrderRequest> {
        self.orders.lock().unwrap().last().cloned()
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderProcessor for FakeOrders {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, ProviderError> {
        self.orders.lock().unwrap().push(request.clone());
        Ok(Order {
            id: "5O1".into(),
            approval_url: Some("https://paypal.example/checkoutnow?token=5O1".into()),
        })
    }

    async fn capture_order(&self, _order_id: &str) -> Result<CapturedOrder, ProviderError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(self.captured.clone())
    }
}

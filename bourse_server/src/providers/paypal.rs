//! Approve-then-capture orders on a PayPal-compatible REST API.
//!
//! Every call first trades the client credentials for a bearer token. Server
//! errors and transport failures are retried twice with a growing pause.
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use super::{CapturedOrder, Order, OrderProcessor, OrderRequest, ProviderError, ensure_success};

pub const LIVE_URL: &str = "https://api-m.paypal.com";
pub const SANDBOX_URL: &str = "https://api-m.sandbox.paypal.com";

const MAX_RETRIES: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(400);
const BRAND_NAME: &str = "TradeSense AI";

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct CaptureResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    #[serde(default)]
    custom_id: Option<String>,
    #[serde(default)]
    payments: Option<UnitPayments>,
}

#[derive(Debug, Deserialize)]
struct UnitPayments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct Capture {
    #[serde(default)]
    custom_id: Option<String>,
    #[serde(default)]
    amount: Option<Money>,
}

#[derive(Debug, Deserialize)]
struct Money {
    currency_code: String,
    value: String,
}

impl From<CaptureResponse> for CapturedOrder {
    fn from(response: CaptureResponse) -> Self {
        let unit = response.purchase_units.into_iter().next();
        let (unit_custom_id, capture) = match unit {
            Some(unit) => (
                unit.custom_id,
                unit.payments.and_then(|p| p.captures.into_iter().next()),
            ),
            None => (None, None),
        };
        let (capture_custom_id, amount) = match capture {
            Some(capture) => (capture.custom_id, capture.amount),
            None => (None, None),
        };

        CapturedOrder {
            status: response.status,
            custom_id: capture_custom_id.or(unit_custom_id),
            amount: amount.as_ref().map(|m| m.value.clone()),
            currency: amount.map(|m| m.currency_code),
        }
    }
}

pub struct PayPalClient {
    http: Client,
    base_url: String,
    client_id: String,
    secret: String,
    retry_delay: Duration,
}

impl PayPalClient {
    pub fn new(http: Client, base_url: &str, client_id: &str, secret: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            secret: secret.to_string(),
            retry_delay: RETRY_DELAY,
        }
    }

    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn send_with_retry(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let mut attempt = 0;
        loop {
            let current = request
                .try_clone()
                .ok_or_else(|| ProviderError::Rejected("request cannot be retried".into()))?;
            match current.send().await {
                Ok(response) if response.status().is_server_error() && attempt < MAX_RETRIES => {
                    warn!("PayPal answered {}, retrying", response.status());
                }
                Ok(response) => return Ok(response),
                Err(e) if attempt < MAX_RETRIES => warn!("PayPal unreachable, retrying: {}", e),
                Err(e) => return Err(e.into()),
            }
            attempt += 1;
            tokio::time::sleep(self.retry_delay * attempt).await;
        }
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let request = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.secret))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")]);
        let token: AccessToken = ensure_success(self.send_with_retry(request).await?)
            .await?
            .json()
            .await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl OrderProcessor for PayPalClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, ProviderError> {
        let token = self.access_token().await?;
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": "USD",
                    "value": request.amount_usd.to_string(),
                },
                "description": request.description,
                "custom_id": request.custom_id,
            }],
            "application_context": {
                "brand_name": BRAND_NAME,
                "landing_page": "NO_PREFERENCE",
                "user_action": "PAY_NOW",
                "return_url": request.return_url,
                "cancel_url": request.cancel_url,
            },
        });
        let http_request = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(&token)
            .header(ACCEPT, "application/json")
            .json(&body);
        let order: OrderResponse = ensure_success(self.send_with_retry(http_request).await?)
            .await?
            .json()
            .await?;

        let approval_url = order
            .links
            .into_iter()
            .find(|link| link.rel == "approve")
            .map(|link| link.href);
        Ok(Order {
            id: order.id,
            approval_url,
        })
    }

    async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder, ProviderError> {
        if !order_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ProviderError::Rejected(format!(
                "malformed order id '{}'",
                order_id
            )));
        }
        let token = self.access_token().await?;
        let request = self
            .http
            .post(format!("{}/v2/checkout/orders/{}/capture", self.base_url, order_id))
            .bearer_auth(&token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        let captured: CaptureResponse = ensure_success(self.send_with_retry(request).await?)
            .await?
            .json()
            .await?;
        Ok(captured.into())
    }
}

//! Customers and checkout sessions on a Stripe-compatible REST API.
//!
//! Requests are form-encoded with bracketed keys for nested fields
//! (`metadata[plan]`, `line_items[0][price]`), authenticated with the secret
//! key as a bearer token.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{CheckoutRequest, CheckoutSession, PaymentProcessor, ProviderError, ensure_success};

#[derive(Debug, Deserialize)]
struct CustomerList {
    data: Vec<Customer>,
}

#[derive(Debug, Deserialize)]
struct Customer {
    id: String,
}

pub struct StripeClient {
    http: Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(http: Client, base_url: &str, secret_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }
}

/// Session ids are pasted into the URL path, so only `[A-Za-z0-9_]` passes.
fn is_session_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Form fields of a checkout session request.
fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("customer".to_string(), request.customer_id.clone()),
        ("line_items[0][price]".to_string(), request.price_id.clone()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];
    form.extend(
        request
            .metadata
            .iter()
            .map(|(key, value)| (format!("metadata[{}]", key), value.clone())),
    );
    form
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn find_customer(&self, email: &str) -> Result<Option<String>, ProviderError> {
        let response = self
            .http
            .get(self.url("customers"))
            .bearer_auth(&self.secret_key)
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await?;
        let list: CustomerList = ensure_success(response).await?.json().await?;
        Ok(list.data.into_iter().next().map(|customer| customer.id))
    }

    async fn create_customer(&self, email: &str, user_id: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(self.url("customers"))
            .bearer_auth(&self.secret_key)
            .form(&[("email", email), ("metadata[supabase_uid]", user_id)])
            .send()
            .await?;
        let customer: Customer = ensure_success(response).await?.json().await?;
        Ok(customer.id)
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError> {
        let response = self
            .http
            .post(self.url("checkout/sessions"))
            .bearer_auth(&self.secret_key)
            .form(&checkout_form(request))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError> {
        if !is_session_id(session_id) {
            return Err(ProviderError::Rejected(format!(
                "malformed session id '{}'",
                session_id
            )));
        }
        let response = self
            .http
            .get(self.url(&format!("checkout/sessions/{}", session_id)))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

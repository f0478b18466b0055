//! Hosted crypto charges on a Coinbase Commerce-compatible API.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{Charge, ChargeRequest, CryptoCheckout, ProviderError, ensure_success};

const API_VERSION: &str = "2018-03-22";

#[derive(Debug, Deserialize)]
struct ChargeEnvelope {
    data: Charge,
}

pub struct CoinbaseCommerceClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl CoinbaseCommerceClient {
    pub fn new(http: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl CryptoCheckout for CoinbaseCommerceClient {
    async fn create_charge(&self, request: &ChargeRequest) -> Result<Charge, ProviderError> {
        let body = json!({
            "name": request.name,
            "description": request.description,
            "pricing_type": "fixed_price",
            "local_price": {
                "amount": request.amount_usd.to_string(),
                "currency": "USD",
            },
            "metadata": request.metadata,
            "redirect_url": request.redirect_url,
            "cancel_url": request.cancel_url,
        });
        let response = self
            .http
            .post(format!("{}/charges", self.base_url))
            .header("X-CC-Api-Key", &self.api_key)
            .header("X-CC-Version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        let envelope: ChargeEnvelope = ensure_success(response).await?.json().await?;
        Ok(envelope.data)
    }
}

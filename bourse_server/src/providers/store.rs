//! Challenge and payment records in a PostgREST-compatible store.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ChallengeStore, ProviderError, ensure_success};
use crate::model::challenge::{NewChallenge, NewPayment};

pub struct SupabaseStore {
    http: Client,
    base_url: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(http: Client, base_url: &str, key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }

    /// Inserts one row and returns the rows echoed back by the store.
    async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<Vec<Value>, ProviderError> {
        let response = self
            .http
            .post(format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let rows = ensure_success(response).await?.json().await?;
        Ok(rows)
    }
}

#[derive(Debug, Deserialize)]
struct PaymentRow {
    #[serde(default)]
    challenge_id: Option<String>,
}

/// Id of the first returned row, as text.
fn first_id(rows: &[Value]) -> Option<String> {
    match rows.first()?.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ChallengeStore for SupabaseStore {
    async fn find_payment_challenge(
        &self,
        payment_id: &str,
    ) -> Result<Option<String>, ProviderError> {
        let response = self
            .http
            .get(format!("{}/rest/v1/payments", self.base_url))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .query(&[
                ("stripe_payment_id", format!("eq.{}", payment_id).as_str()),
                ("select", "challenge_id"),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let rows: Vec<PaymentRow> = ensure_success(response).await?.json().await?;
        Ok(rows.into_iter().find_map(|row| row.challenge_id))
    }

    async fn insert_challenge(
        &self,
        challenge: &NewChallenge,
    ) -> Result<Option<String>, ProviderError> {
        let rows = self.insert("challenges", challenge).await?;
        Ok(first_id(&rows))
    }

    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), ProviderError> {
        self.insert("payments", payment).await?;
        Ok(())
    }
}

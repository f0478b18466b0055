//! Bearer-token verification against a Supabase-compatible auth endpoint.
use async_trait::async_trait;
use reqwest::Client;

use super::{IdentityProvider, ProviderError, User, ensure_success};

pub struct SupabaseIdentity {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseIdentity {
    pub fn new(http: Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn verify(&self, token: &str) -> Result<User, ProviderError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        let user: User = ensure_success(response).await?.json().await?;
        if user.id.is_empty() {
            return Err(ProviderError::Rejected("token resolved to no user".into()));
        }
        Ok(user)
    }
}

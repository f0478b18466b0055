//! Server configuration read from the process environment.
//!
//! A `.env` file is loaded first (see `main`), then every setting is looked up
//! by name. Collaborators whose settings are missing stay unconfigured; the
//! routes that need them answer with a configuration error instead of the
//! server refusing to start.
use bourse_common::net::DEFAULT_PORT;
use bourse_common::{BourseError, Result};

use crate::providers::paypal::{LIVE_URL, SANDBOX_URL};

const DEFAULT_FINNHUB_URL: &str = "https://finnhub.io/api/v1";
const DEFAULT_STRIPE_URL: &str = "https://api.stripe.com";
const DEFAULT_COINBASE_URL: &str = "https://api.commerce.coinbase.com";

/// Identity provider endpoint and public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub base_url: String,
    pub anon_key: String,
}

/// Persistence endpoint and the key used for writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub key: String,
}

/// Live quote provider endpoint and token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinnhubConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Payment processor endpoint and secret key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeConfig {
    pub base_url: String,
    pub secret_key: String,
}

/// Crypto charge endpoint and API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Order processor endpoint and client credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayPalConfig {
    pub base_url: String,
    pub client_id: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub identity: Option<IdentityConfig>,
    pub store: Option<StoreConfig>,
    pub finnhub: Option<FinnhubConfig>,
    pub stripe: Option<StripeConfig>,
    pub crypto: Option<CryptoConfig>,
    pub paypal: Option<PayPalConfig>,
}

impl ServerConfig {
    /// Reads the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| BourseError::Format(format!("Invalid PORT '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let supabase_url = get("SUPABASE_URL").or_else(|| get("VITE_SUPABASE_URL"));
        let anon_key = get("SUPABASE_ANON_KEY").or_else(|| get("VITE_SUPABASE_PUBLISHABLE_KEY"));
        let service_key = get("SUPABASE_SERVICE_ROLE_KEY");

        let identity = match (&supabase_url, &anon_key) {
            (Some(base_url), Some(anon_key)) => Some(IdentityConfig {
                base_url: base_url.clone(),
                anon_key: anon_key.clone(),
            }),
            _ => None,
        };
        let store = match (&supabase_url, service_key.or(anon_key)) {
            (Some(base_url), Some(key)) => Some(StoreConfig {
                base_url: base_url.clone(),
                key,
            }),
            _ => None,
        };
        let finnhub = get("FINNHUB_API_KEY").map(|api_key| FinnhubConfig {
            base_url: get("FINNHUB_BASE_URL").unwrap_or_else(|| DEFAULT_FINNHUB_URL.to_string()),
            api_key,
        });
        let stripe = get("STRIPE_SECRET_KEY").map(|secret_key| StripeConfig {
            base_url: get("STRIPE_BASE_URL").unwrap_or_else(|| DEFAULT_STRIPE_URL.to_string()),
            secret_key,
        });

        let crypto = get("COINBASE_COMMERCE_API_KEY").map(|api_key| CryptoConfig {
            base_url: get("COINBASE_COMMERCE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_COINBASE_URL.to_string()),
            api_key,
        });
        // PAYPAL_BASE_URL wins over PAYPAL_MODE; any mode but `live` is the sandbox.
        let paypal = match (get("PAYPAL_CLIENT_ID"), get("PAYPAL_SECRET")) {
            (Some(client_id), Some(secret)) => {
                let live = get("PAYPAL_MODE").is_some_and(|mode| mode.trim().eq_ignore_ascii_case("live"));
                let default_url = if live { LIVE_URL } else { SANDBOX_URL };
                Some(PayPalConfig {
                    base_url: get("PAYPAL_BASE_URL").unwrap_or_else(|| default_url.to_string()),
                    client_id: client_id.trim().to_string(),
                    secret: secret.trim().to_string(),
                })
            }
            _ => None,
        };

        Ok(Self {
            port,
            identity,
            store,
            finnhub,
            stripe,
            crypto,
            paypal,
        })
    }
}

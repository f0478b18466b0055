use std::sync::Arc;

use bourse_common::SymbolRegistry;
use chrono::{Local, NaiveDateTime};
use log::{info, warn};
use reqwest::Client;

use crate::config::ServerConfig;
use crate::providers::{
    ChallengeStore, CoinbaseCommerceClient, CryptoCheckout, FinnhubClient, IdentityProvider,
    OrderProcessor, PayPalClient, PaymentProcessor, QuoteProvider, StripeClient, SupabaseIdentity,
    SupabaseStore,
};

/// Wall-clock source, as a naive local date-time.
pub type Clock = fn() -> NaiveDateTime;

/// Shared state handed to every handler.
///
/// Collaborators are optional; an absent one makes the routes that depend on
/// it answer with a configuration error.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SymbolRegistry>,
    pub clock: Clock,
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub quotes: Option<Arc<dyn QuoteProvider>>,
    pub payments: Option<Arc<dyn PaymentProcessor>>,
    pub store: Option<Arc<dyn ChallengeStore>>,
    pub crypto: Option<Arc<dyn CryptoCheckout>>,
    pub orders: Option<Arc<dyn OrderProcessor>>,
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl AppState {
    /// State with the local clock and no collaborators.
    pub fn new(registry: SymbolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            clock: local_now,
            identity: None,
            quotes: None,
            payments: None,
            store: None,
            crypto: None,
            orders: None,
        }
    }

    /// Wires the HTTP adapters of every configured collaborator around one
    /// shared client.
    pub fn from_config(config: &ServerConfig, registry: SymbolRegistry) -> Self {
        let http = Client::new();
        let mut state = Self::new(registry);

        if let Some(c) = &config.identity {
            state = state.with_identity(Arc::new(SupabaseIdentity::new(
                http.clone(),
                &c.base_url,
                &c.anon_key,
            )));
        } else {
            warn!("Identity provider not configured, authenticated routes will fail");
        }
        if let Some(c) = &config.store {
            state = state.with_store(Arc::new(SupabaseStore::new(http.clone(), &c.base_url, &c.key)));
        } else {
            warn!("Challenge store not configured");
        }
        if let Some(c) = &config.finnhub {
            state = state.with_quotes(Arc::new(FinnhubClient::new(
                http.clone(),
                &c.base_url,
                &c.api_key,
            )));
        } else {
            warn!("FINNHUB_API_KEY not set, live market data disabled");
        }
        if let Some(c) = &config.stripe {
            state = state.with_payments(Arc::new(StripeClient::new(
                http.clone(),
                &c.base_url,
                &c.secret_key,
            )));
        } else {
            warn!("STRIPE_SECRET_KEY not set, checkout disabled");
        }
        if let Some(c) = &config.crypto {
            state = state.with_crypto(Arc::new(CoinbaseCommerceClient::new(
                http.clone(),
                &c.base_url,
                &c.api_key,
            )));
        } else {
            warn!("COINBASE_COMMERCE_API_KEY not set, crypto checkout disabled");
        }
        if let Some(c) = &config.paypal {
            state = state.with_orders(Arc::new(PayPalClient::new(
                http,
                &c.base_url,
                &c.client_id,
                &c.secret,
            )));
        } else {
            warn!("PAYPAL_CLIENT_ID/PAYPAL_SECRET not set, PayPal checkout disabled");
        }

        info!(
            "Collaborators: identity={} store={} quotes={} payments={} crypto={} orders={}",
            state.identity.is_some(),
            state.store.is_some(),
            state.quotes.is_some(),
            state.payments.is_some(),
            state.crypto.is_some(),
            state.orders.is_some()
        );
        state
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_quotes(mut self, quotes: Arc<dyn QuoteProvider>) -> Self {
        self.quotes = Some(quotes);
        self
    }

    pub fn with_payments(mut self, payments: Arc<dyn PaymentProcessor>) -> Self {
        self.payments = Some(payments);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ChallengeStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_crypto(mut self, crypto: Arc<dyn CryptoCheckout>) -> Self {
        self.crypto = Some(crypto);
        self
    }

    pub fn with_orders(mut self, orders: Arc<dyn OrderProcessor>) -> Self {
        self.orders = Some(orders);
        self
    }

    /// Current time according to the state's clock.
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

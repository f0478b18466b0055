//! Live quotes from a Finnhub-compatible `/quote` endpoint.
//!
//! The provider answers with single-letter fields (`c` current, `d` change,
//! `dp` change percent, `h` high, `l` low, `o` open, `pc` previous close, `t`
//! epoch seconds). Unknown symbols come back as zeros or nulls, so a current
//! price that is missing or not positive means "no data".
use async_trait::async_trait;
use bourse_common::tickers::LiveTicker;
use bourse_common::wire::LiveQuote;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, QuoteProvider, ensure_success};

#[derive(Debug, Default, Deserialize)]
struct FinnhubQuote {
    c: Option<f64>,
    d: Option<f64>,
    dp: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    o: Option<f64>,
    pc: Option<f64>,
    t: Option<i64>,
}

impl FinnhubQuote {
    /// Zero and missing values fall back: changes to 0, the session figures to
    /// the current price, the timestamp to `now_secs`.
    fn into_live_quote(self, symbol: String, now_secs: i64) -> Option<LiveQuote> {
        let price = self.c.filter(|c| *c > 0.0)?;
        let or_price = |value: Option<f64>| value.filter(|v| *v != 0.0).unwrap_or(price);

        Some(LiveQuote {
            symbol,
            price,
            change: self.d.unwrap_or(0.0),
            change_percent: self.dp.unwrap_or(0.0),
            high: or_price(self.h),
            low: or_price(self.l),
            open: or_price(self.o),
            previous_close: or_price(self.pc),
            timestamp: self.t.filter(|t| *t != 0).unwrap_or(now_secs),
        })
    }
}

pub struct FinnhubClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl FinnhubClient {
    pub fn new(http: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl QuoteProvider for FinnhubClient {
    async fn quote(&self, ticker: LiveTicker) -> Result<LiveQuote, ProviderError> {
        let response = self
            .http
            .get(format!("{}/quote", self.base_url))
            .query(&[
                ("symbol", ticker.provider_symbol()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let raw: FinnhubQuote = ensure_success(response).await?.json().await?;

        raw.into_live_quote(ticker.to_string(), Utc::now().timestamp())
            .ok_or_else(|| ProviderError::Rejected(format!("no data for {}", ticker)))
    }
}

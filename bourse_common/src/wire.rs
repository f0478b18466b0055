//! JSON payloads exchanged between the quote client and the server.
//!
//! Field names follow the camelCase convention of the browser front-end that
//! consumes the same routes.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::simulator::SimulatedQuote;

/// Source tag of the simulated Casablanca feed.
pub const SIMULATED_SOURCE: &str = "casablanca-bourse-simulated";

/// Body of a batch quote request, as sent by the client.
///
/// The server reads the body as untyped JSON instead, so that it can tell an
/// absent `symbols` field (defaults apply) from one that is not a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotesRequest {
    /// Requested symbols.
    pub symbols: Vec<String>,
}

impl QuotesRequest {
    /// Request for an explicit list of symbols.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

/// Successful answer of the simulated batch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BourseResponse {
    /// Always `true` for this envelope.
    pub success: bool,
    /// One quote per valid requested symbol, in request order.
    pub quotes: Vec<SimulatedQuote>,
    /// Feed identifier, [`SIMULATED_SOURCE`].
    pub source: String,
    /// When the response was generated.
    pub timestamp: NaiveDateTime,
}

impl BourseResponse {
    /// Wraps simulated quotes in the success envelope.
    pub fn new(quotes: Vec<SimulatedQuote>, timestamp: NaiveDateTime) -> Self {
        Self {
            success: true,
            quotes,
            source: SIMULATED_SOURCE.to_string(),
            timestamp,
        }
    }
}

/// Error body returned by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    #[serde(default)]
    pub success: bool,
    /// Human-readable reason.
    pub error: String,
}

/// Quote relayed from the live provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveQuote {
    /// Requested symbol, uppercased.
    pub symbol: String,
    /// Current price.
    pub price: f64,
    /// Absolute change since previous close.
    pub change: f64,
    /// Percent change since previous close.
    pub change_percent: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Session open.
    pub open: f64,
    /// Previous close.
    pub previous_close: f64,
    /// Provider timestamp, seconds since the Unix epoch.
    pub timestamp: i64,
}

/// Answer of the live market-data relay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketDataResponse {
    /// Quotes that were fetched.
    pub quotes: Vec<LiveQuote>,
    /// Symbols whose fetch failed.
    pub errors: Vec<String>,
}

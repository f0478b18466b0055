//! Deterministic quote simulator for the Casablanca bourse.
//!
//! Stands in for a live feed: the price of a symbol swings up to ±2% around its
//! registry base price, driven by a seed built from the symbol's first character
//! and the minute of the day. Two calls within the same minute for the same
//! symbol yield the same numbers; the walk jumps at every minute boundary.
//!
//! The clock is never read here. Callers pass `now` explicitly, which keeps the
//! function pure and lets tests pin any time of day.
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::registry::SymbolRegistry;

/// Base price used for symbols missing from the registry.
pub const FALLBACK_BASE_PRICE: f64 = 100.0;

/// Maximum relative swing around the base price (±2%, so 4% peak to peak).
const SWING: f64 = 0.04;

/// Synthetic quote for one symbol at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedQuote {
    /// Requested symbol, uppercased.
    pub symbol: String,
    /// Display name from the registry, or the symbol itself.
    pub name: String,
    /// Simulated price, two decimals.
    pub price: f64,
    /// `price - base`, two decimals.
    pub change: f64,
    /// `change / base * 100`, two decimals.
    pub change_percent: f64,
    /// Instant the quote was generated for.
    pub last_update: NaiveDateTime,
}

/// Produces the simulated quote of `symbol` at `now`.
///
/// Unregistered symbols are priced around [`FALLBACK_BASE_PRICE`] and named
/// after themselves.
pub fn simulate(symbol: &str, now: NaiveDateTime, registry: &SymbolRegistry) -> SimulatedQuote {
    let symbol = symbol.to_uppercase();
    let base_price = registry
        .base_price(&symbol)
        .unwrap_or(FALLBACK_BASE_PRICE);
    let name = registry.name(&symbol).unwrap_or(symbol.as_str()).to_string();

    let seed = seed(&symbol, minute_of_day(&now));
    let variation = (seed as f64 / 1000.0 - 0.5) * SWING;

    let price = round2(base_price * (1.0 + variation));
    let change = round2(price - base_price);
    let change_percent = round2(change / base_price * 100.0);

    SimulatedQuote {
        symbol,
        name,
        price,
        change,
        change_percent,
        last_update: now,
    }
}

/// Minutes elapsed since midnight, in `[0, 1439]`.
fn minute_of_day(now: &NaiveDateTime) -> u32 {
    now.hour() * 60 + now.minute()
}

/// `(codepoint(first char) * 1000 + minute_of_day) mod 1000`, in `[0, 999]`.
///
/// An empty symbol counts as codepoint 0.
fn seed(symbol: &str, minute_of_day: u32) -> u64 {
    let codepoint = symbol.chars().next().map_or(0, u64::from);
    (codepoint * 1000 + u64::from(minute_of_day)) % 1000
}

/// Rounds to two decimal places.
///
/// Works on the exact decimal expansion of `value`: scaling by 100 first can
/// land on a `.5` the stored value never reached (605 * 0.981 is stored just
/// below 593.505 and must round down).
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

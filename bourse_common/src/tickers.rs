//! Ticker symbols and parsing helpers shared between client and server.
//!
//! - `LiveTicker`: whitelist of symbols relayed to the live quote provider,
//!   with the provider-side symbol each one maps to.
//! - `read_symbols`: reads a free-form symbol list (commas, whitespace or new
//!   lines) from any buffered reader.
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::BourseError;
use crate::result::Result;

/// Symbols accepted by the live market-data relay.
#[allow(missing_docs)]
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, Hash, Eq, PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum LiveTicker {
    // US stocks
    AAPL,
    MSFT,
    GOOGL,
    AMZN,
    NVDA,
    TSLA,
    META,
    // Crypto
    BTC,
    ETH,
    BNB,
    SOL,
    XRP,
    ADA,
    DOGE,
    // Forex
    EURUSD,
    GBPUSD,
    USDJPY,
    USDCHF,
    AUDUSD,
    USDCAD,
    EURGBP,
    USDMAD,
}

impl LiveTicker {
    /// Symbol understood by the live provider.
    pub fn provider_symbol(&self) -> &'static str {
        match self {
            LiveTicker::AAPL => "AAPL",
            LiveTicker::MSFT => "MSFT",
            LiveTicker::GOOGL => "GOOGL",
            LiveTicker::AMZN => "AMZN",
            LiveTicker::NVDA => "NVDA",
            LiveTicker::TSLA => "TSLA",
            LiveTicker::META => "META",
            LiveTicker::BTC => "BINANCE:BTCUSDT",
            LiveTicker::ETH => "BINANCE:ETHUSDT",
            LiveTicker::BNB => "BINANCE:BNBUSDT",
            LiveTicker::SOL => "BINANCE:SOLUSDT",
            LiveTicker::XRP => "BINANCE:XRPUSDT",
            LiveTicker::ADA => "BINANCE:ADAUSDT",
            LiveTicker::DOGE => "BINANCE:DOGEUSDT",
            LiveTicker::EURUSD => "OANDA:EUR_USD",
            LiveTicker::GBPUSD => "OANDA:GBP_USD",
            LiveTicker::USDJPY => "OANDA:USD_JPY",
            LiveTicker::USDCHF => "OANDA:USD_CHF",
            LiveTicker::AUDUSD => "OANDA:AUD_USD",
            LiveTicker::USDCAD => "OANDA:USD_CAD",
            LiveTicker::EURGBP => "OANDA:EUR_GBP",
            // no provider mapping, relayed as is
            LiveTicker::USDMAD => "USDMAD",
        }
    }
}

/// Reads symbols separated by commas, whitespace or new lines.
///
/// Empty tokens are skipped; case is kept as written.
pub fn read_symbols<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut symbols = Vec::new();

    for line_result in reader.lines() {
        let line = line_result.map_err(BourseError::Io)?;
        for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            if !token.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(BourseError::ParseSymbols(format!(
                    "invalid symbol '{}'",
                    token
                )));
            }
            symbols.push(token.to_string());
        }
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_ticker_parses_case_insensitively() {
        assert_eq!("btc".parse::<LiveTicker>().unwrap(), LiveTicker::BTC);
        assert_eq!("EurUsd".parse::<LiveTicker>().unwrap(), LiveTicker::EURUSD);
        assert!("IAM".parse::<LiveTicker>().is_err());
    }

    #[test]
    fn provider_symbols_by_asset_class() {
        assert_eq!(LiveTicker::AAPL.provider_symbol(), "AAPL");
        assert_eq!(LiveTicker::DOGE.provider_symbol(), "BINANCE:DOGEUSDT");
        assert_eq!(LiveTicker::USDJPY.provider_symbol(), "OANDA:USD_JPY");
        assert_eq!(LiveTicker::USDMAD.provider_symbol(), "USDMAD");
    }

    #[test]
    fn read_symbols_accepts_mixed_separators() {
        let input = "IAM, atw\n\n  BCP\tLHM,,CIH\n";
        let symbols = read_symbols(input.as_bytes()).unwrap();
        assert_eq!(symbols, vec!["IAM", "atw", "BCP", "LHM", "CIH"]);
    }

    #[test]
    fn read_symbols_rejects_garbage() {
        let err = read_symbols("IAM;ATW".as_bytes()).unwrap_err();
        assert!(matches!(err, BourseError::ParseSymbols(_)));
    }
}

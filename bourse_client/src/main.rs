//! Bourse Client: requests simulated Casablanca quotes from the server and
//! logs them. It reads a list of symbols from a text file (or uses the default
//! batch), posts it to the server's `/casablanca-bourse` route and prints one
//! line per quote. With `--offline` the same quotes are computed locally.
//!
//! Usage example (CLI):
//! ```bash
//! bourse_client --server-url http://192.168.0.10:54321 --path ./symbols.txt
//! bourse_client --offline
//! ```
//!
//! The symbol file should contain symbols separated by commas, spaces, or new lines.
#![warn(missing_docs)]
mod args;
mod sender;

use crate::args::Args;
use crate::sender::QuoteSender;
use bourse_common::registry::DEFAULT_SYMBOLS;
use bourse_common::tickers::read_symbols;
use bourse_common::{BourseError, Result, SimulatedQuote, SymbolRegistry, simulate};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use log::{error, info};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

fn main() {
    init_logger();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let symbols = load_symbols(args.path.as_deref())?;
    info!("Symbols: {:?}", symbols);

    let quotes = if args.offline {
        let registry = SymbolRegistry::casablanca()?;
        offline_quotes(&registry, &symbols, Local::now().naive_local())?
    } else {
        QuoteSender::new(args.server_url.trim()).fetch(&symbols)?
    };

    for quote in &quotes {
        info!(
            "QUOTE: {} ({}) Price={:.2} Change={:+.2} ({:+.2}%) Time={}",
            quote.symbol, quote.name, quote.price, quote.change, quote.change_percent, quote.last_update
        );
    }
    Ok(())
}

/// Symbols from the file at `path`, or the default batch when no file is given.
fn load_symbols(path: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = path else {
        return Ok(DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect());
    };
    let file = File::open(normalize_path(raw))?;
    let symbols = read_symbols(BufReader::new(file))?;
    if symbols.is_empty() {
        return Err(BourseError::ParseSymbols(format!("no symbols in {}", raw)));
    }
    Ok(symbols)
}

/// Quotes the symbols the registry knows, the way the server does.
fn offline_quotes(
    registry: &SymbolRegistry,
    symbols: &[String],
    now: NaiveDateTime,
) -> Result<Vec<SimulatedQuote>> {
    let known = registry.filter_known(symbols);
    if known.is_empty() {
        return Err(BourseError::UnknownSymbol(symbols.join(",")));
    }
    Ok(known.iter().map(|s| simulate(s, now, registry)).collect())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

//! Static symbol registry for the Casablanca bourse.
//!
//! The registry maps every known ticker to its display name and to the base price
//! the simulator swings around. It is parsed once from a line-oriented text
//! resource and never mutated afterwards: there is no insert or remove API, only
//! lookups. Both mappings are filled from the same records, so they always share
//! an identical key set.
//!
//! Record format, one per line:
//!
//! ```text
//! IAM|Maroc Telecom|111.70
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.
use std::collections::HashMap;
use std::io::BufRead;

use crate::error::BourseError;
use crate::result::Result;

/// Built-in table shipped with the binaries.
const CASABLANCA: &str = include_str!("../data/casablanca.txt");

/// Symbols requested when a caller does not name any.
pub const DEFAULT_SYMBOLS: [&str; 6] = ["IAM", "ATW", "BCP", "LHM", "CIH", "TQM"];

/// Immutable ticker → (display name, base price) table.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    /// Symbols in resource order.
    order: Vec<String>,
    names: HashMap<String, String>,
    base_prices: HashMap<String, f64>,
}

impl SymbolRegistry {
    /// Load the built-in Casablanca table.
    pub fn casablanca() -> Result<Self> {
        Self::parse_from_reader(CASABLANCA.as_bytes())
    }

    /// Parses a registry from a buffered reader.
    ///
    /// Symbols are stored uppercased. Fails on a malformed record, a
    /// non-positive price or a duplicate symbol.
    pub fn parse_from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut order = Vec::new();
        let mut names = HashMap::new();
        let mut base_prices = HashMap::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(BourseError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            let line_no = index + 1;
            let parse_err = |reason: String| BourseError::ParseRegistry {
                line: line_no,
                reason,
            };

            let fields: Vec<&str> = trimmed_line.split('|').map(str::trim).collect();
            let [symbol, name, price] = fields.as_slice() else {
                return Err(parse_err(format!(
                    "expected 3 fields separated by '|', got {}",
                    fields.len()
                )));
            };
            if symbol.is_empty() {
                return Err(parse_err("empty symbol".to_string()));
            }
            if name.is_empty() {
                return Err(parse_err(format!("empty display name for {}", symbol)));
            }
            let base_price: f64 = price
                .parse()
                .map_err(|e| parse_err(format!("invalid base price '{}': {}", price, e)))?;
            if !base_price.is_finite() || base_price <= 0.0 {
                return Err(parse_err(format!(
                    "base price must be positive, got {}",
                    base_price
                )));
            }

            let symbol = symbol.to_uppercase();
            if names.contains_key(&symbol) {
                return Err(parse_err(format!("duplicate symbol {}", symbol)));
            }
            names.insert(symbol.clone(), name.to_string());
            base_prices.insert(symbol.clone(), base_price);
            order.push(symbol);
        }

        Ok(Self {
            order,
            names,
            base_prices,
        })
    }

    /// Display name of an (uppercase) symbol.
    pub fn name(&self, symbol: &str) -> Option<&str> {
        self.names.get(symbol).map(String::as_str)
    }

    /// Base price of an (uppercase) symbol.
    pub fn base_price(&self, symbol: &str) -> Option<f64> {
        self.base_prices.get(symbol).copied()
    }

    /// Whether the (uppercase) symbol is registered.
    pub fn contains(&self, symbol: &str) -> bool {
        self.base_prices.contains_key(symbol)
    }

    /// Registered symbols in resource order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no symbol is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Uppercases the requested symbols and keeps the registered ones.
    ///
    /// Request order and duplicates are preserved.
    pub fn filter_known<I, S>(&self, requested: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        requested
            .into_iter()
            .map(|s| s.as_ref().to_uppercase())
            .filter(|s| self.contains(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_twenty_tickers() {
        let registry = SymbolRegistry::casablanca().unwrap();
        assert_eq!(registry.len(), 20);
        assert_eq!(registry.name("IAM"), Some("Maroc Telecom"));
        assert_eq!(registry.name("CDM"), Some("Crédit du Maroc"));
        assert_eq!(registry.base_price("IAM"), Some(111.70));
        assert_eq!(registry.base_price("HPS"), Some(6500.0));
        assert_eq!(registry.symbols().next(), Some("IAM"));
    }

    #[test]
    fn names_and_prices_share_keys() {
        let registry = SymbolRegistry::casablanca().unwrap();
        for symbol in registry.symbols() {
            assert!(registry.name(symbol).is_some(), "{symbol} has no name");
            assert!(registry.base_price(symbol).is_some(), "{symbol} has no price");
        }
        assert_eq!(registry.names.len(), registry.base_prices.len());
    }

    #[test]
    fn default_symbols_are_registered() {
        let registry = SymbolRegistry::casablanca().unwrap();
        assert!(DEFAULT_SYMBOLS.iter().all(|s| registry.contains(s)));
    }

    #[test]
    fn lookups_are_exact() {
        let registry = SymbolRegistry::casablanca().unwrap();
        assert!(!registry.contains("iam"));
        assert_eq!(registry.base_price("ZZZ"), None);
    }

    #[test]
    fn parse_skips_comments_and_uppercases() {
        let input = "# header\n\n  abc | Alpha | 10.5 \n";
        let registry = SymbolRegistry::parse_from_reader(input.as_bytes()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.name("ABC"), Some("Alpha"));
        assert_eq!(registry.base_price("ABC"), Some(10.5));
    }

    #[test]
    fn parse_rejects_duplicates() {
        let input = "ABC|Alpha|1\nabc|Again|2\n";
        let err = SymbolRegistry::parse_from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, BourseError::ParseRegistry { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_bad_records() {
        for input in ["ABC|Alpha", "ABC|Alpha|x", "ABC|Alpha|-3", "|Alpha|3", "ABC||3"] {
            assert!(
                SymbolRegistry::parse_from_reader(input.as_bytes()).is_err(),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn filter_known_keeps_order_and_duplicates() {
        let registry = SymbolRegistry::casablanca().unwrap();
        let kept = registry.filter_known(["atw", "nope", "IAM", "Atw"]);
        assert_eq!(kept, vec!["ATW", "IAM", "ATW"]);
    }
}

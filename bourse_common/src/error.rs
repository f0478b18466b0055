//! Error types shared between client and server.
//!
//! The `BourseError` enum unifies the failure cases of the shared domain code:
//! I/O, registry and symbol-list parsing, JSON (de)serialization and HTTP
//! transport, so every crate can propagate a single error type.
use std::io;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum BourseError {
    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing the symbol registry resource.
    #[error("Parse registry error at line {line}: {reason}")]
    ParseRegistry {
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Error while reading a list of symbols.
    #[error("Parse symbols error: {0}")]
    ParseSymbols(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// HTTP transport or status failure; contains a short context string.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A symbol that is not part of the registry was requested where one is required.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

//!
//! Common types and utilities shared by the bourse server and client.
//!
//! This crate aggregates:
//! - `error`: unified error type `BourseError` used across the workspace.
//! - `result`: handy `Result<T, BourseError>` alias.
//! - `registry`: immutable Casablanca symbol table (names and base prices).
//! - `simulator`: deterministic, clock-free quote simulation.
//! - `tickers`: live-provider ticker whitelist and symbol-list parsing.
//! - `wire`: JSON request/response payloads.
//! - `net`: networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod registry;
pub mod result;
pub mod simulator;
pub mod tickers;
pub mod wire;

pub use error::BourseError;
pub use registry::SymbolRegistry;
pub use result::Result;
pub use simulator::{SimulatedQuote, simulate};

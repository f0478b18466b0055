//! Result type alias shared across the workspace.
//!
//! Defaults the error type to the common `BourseError`, so functions can simply
//! return `Result<T>`.
use crate::error::BourseError;

/// Workspace-wide `Result` alias with `BourseError` as the default error.
pub type Result<T, E = BourseError> = std::result::Result<T, E>;

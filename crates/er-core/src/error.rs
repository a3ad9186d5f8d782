//! Shared error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `TrialError`,
//! `OutputError`) and convert `ErError` where a config failure bubbles up.

use thiserror::Error;

/// The top-level error type for `er-core`.
#[derive(Debug, Error)]
pub enum ErError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `er-core`.
pub type ErResult<T> = Result<T, ErError>;

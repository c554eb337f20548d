//! Error types for the few edges that can actually fail
//!
//! The simulation itself is infallible; only configuration parsing and the
//! persistent rally store report errors.

use thiserror::Error;

/// Tuning could not be loaded or describes an unplayable court
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning rejected: {0}")]
    Invalid(String),
}

/// The persistent max-rally store rejected an operation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistent storage is unavailable")]
    Unavailable,
    #[error("failed to write `{key}`: {reason}")]
    Write { key: &'static str, reason: String },
}

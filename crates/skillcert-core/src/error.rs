//! # Validation Errors
//!
//! Errors raised while parsing domain primitives from untrusted text
//! (HTTP paths, CLI arguments, snapshot files).

use thiserror::Error;

/// Domain primitive validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Credential identifier is not a positive integer.
    #[error("invalid credential id: {0:?}")]
    InvalidCredentialId(String),

    /// Timestamp is not RFC 3339 UTC, or is out of range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Validity period is not a whole number of seconds.
    #[error("invalid validity period: {0:?}")]
    InvalidValidityPeriod(String),
}

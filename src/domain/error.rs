//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the relation entry contract.
///
/// Tree building, filtering and auditing never fail; these arise only when
/// raw rows are coerced into entries or when options are parsed.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid entry at index {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error("invalid depth policy: {0} (expected 'reported' or 'path-depth')")]
    InvalidDepthPolicy(String),

    #[error("invalid search pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

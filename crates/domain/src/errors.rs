//! Error types used throughout the engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for SiteLedger
///
/// The first four variants are the caller-facing taxonomy. The remaining
/// variants surface collaborator failures (storage, configuration).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SiteLedgerError {
    /// Malformed or out-of-range input. `field` names the rejected input.
    #[error("Invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation is illegal for the entity's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A keyed write collided with an existing row.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SiteLedgerError {
    /// Shorthand for an [`SiteLedgerError::InvalidArgument`] on `field`.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { field: field.into(), reason: reason.into() }
    }
}

/// Result type alias for SiteLedger operations
pub type Result<T> = std::result::Result<T, SiteLedgerError>;

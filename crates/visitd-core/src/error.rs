//! Shared error type across visitd crates.

use serde::Serialize;
use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientCode {
    /// Counter store unreachable, timed out, or dropped the connection.
    StoreUnavailable,
    /// Counter key holds something that is not a valid visit count.
    InvalidCounter,
    /// Startup configuration rejected.
    BadConfig,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::InvalidCounter => "INVALID_COUNTER",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, VisitError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("invalid counter at key {key:?}: {reason}")]
    InvalidCounter { key: String, reason: String },
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl VisitError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            VisitError::StoreUnavailable(_) => ClientCode::StoreUnavailable,
            VisitError::InvalidCounter { .. } => ClientCode::InvalidCounter,
            VisitError::BadConfig(_) => ClientCode::BadConfig,
            VisitError::Internal(_) => ClientCode::Internal,
        }
    }

    pub fn invalid_counter(key: &str, reason: impl Into<String>) -> Self {
        VisitError::InvalidCounter {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

//! Gateway error types.

/// Wire shape of a backend error body.
///
/// The REST layer reports errors as `{"message": ..., "code": ...}`; the
/// storage layer uses `statusCode` instead of `code`. Both are accepted.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Machine code, e.g. `PGRST116` (no rows) or `23505` (unique violation).
    #[serde(default, alias = "statusCode")]
    pub code: Option<String>,
}

/// Unique-violation SQLSTATE reported on duplicate-key inserts.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// "Single row requested, zero rows returned" code from the REST layer.
pub(crate) const NO_ROWS: &str = "PGRST116";

/// Errors that can occur when talking to the hosted backend.
///
/// `NotFound` and `Conflict` are split out from the generic `Api` variant
/// so callers can branch on them: retry or fall back on a conflict, treat
/// not-found as a valid empty result.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("backend error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Machine code, when the backend provided one.
        code: Option<String>,
    },

    /// The requested row or object does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// What was looked up (table or bucket path).
        what: String,
    },

    /// A write collided with an existing unique key.
    #[error("conflict: {message}")]
    Conflict {
        /// Error message from the backend.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid gateway configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Whether this error means "the thing does not exist".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error is a duplicate-key conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

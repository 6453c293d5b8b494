//! Client error types.

use receipt_cloud_gateway::GatewayError;

/// Errors surfaced by the receipt-cloud SDK.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend request failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Login rejected.
    ///
    /// Deliberately identical for an unknown username, an inactive account
    /// and a wrong password, so the message leaks nothing about which
    /// field was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Serial issuance kept colliding under the retry policy.
    #[error("serial issuance conflicted {attempts} times, giving up")]
    SerialConflict {
        /// How many attempts were made.
        attempts: u32,
    },

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether this error is a not-found from the backend.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_not_found())
    }
}

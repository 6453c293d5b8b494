//! The gateway handle and its configuration.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};

use crate::error::{ErrorBody, GatewayError, NO_ROWS, UNIQUE_VIOLATION};

/// Default bucket holding generated receipt artifacts.
pub const DEFAULT_BUCKET: &str = "receipts";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Project base URL, e.g. `https://project.example.co`.
    pub base_url: String,

    /// Project API key, sent both as `apikey` and bearer token.
    pub api_key: String,

    /// Bucket used when the caller does not name one.
    pub default_bucket: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `RECEIPT_BACKEND_URL`, `RECEIPT_BACKEND_API_KEY` and
    /// `RECEIPT_BUCKET` (default `receipts`).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] when the URL or API key is
    /// missing.
    pub fn from_env() -> Result<Self, GatewayError> {
        let base_url = std::env::var("RECEIPT_BACKEND_URL")
            .map_err(|_| GatewayError::Configuration("RECEIPT_BACKEND_URL is not set".into()))?;
        let api_key = std::env::var("RECEIPT_BACKEND_API_KEY").map_err(|_| {
            GatewayError::Configuration("RECEIPT_BACKEND_API_KEY is not set".into())
        })?;
        let default_bucket =
            std::env::var("RECEIPT_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.into());

        Ok(Self {
            base_url,
            api_key,
            default_bucket,
        })
    }
}

/// Handle to the hosted backend.
///
/// Wraps one shared HTTP client; cloning is cheap and every clone talks to
/// the same project.
#[derive(Debug, Clone)]
pub struct Gateway {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) default_bucket: String,
}

impl Gateway {
    /// Create a gateway bound to a project URL and API key.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            default_bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    /// Create a gateway from a [`GatewayConfig`].
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut gateway = Self::new(config.base_url.clone(), config.api_key.clone());
        gateway.default_bucket.clone_from(&config.default_bucket);
        gateway
    }

    /// The bucket used when callers do not name one.
    #[must_use]
    pub fn default_bucket(&self) -> &str {
        &self.default_bucket
    }

    /// Start a request with the project auth headers attached.
    pub(crate) fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Map a non-success response to a [`GatewayError`].
    ///
    /// `what` names the table or object the request targeted and ends up
    /// in `NotFound` errors.
    pub(crate) async fn check(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: Option<ErrorBody> = response.json().await.ok();
        let message = body
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| format!("HTTP {status}"));
        let code = body.and_then(|b| b.code);

        tracing::warn!(
            status = status.as_u16(),
            code = code.as_deref(),
            what,
            "backend request failed: {message}"
        );

        if status == reqwest::StatusCode::NOT_FOUND || code.as_deref() == Some(NO_ROWS) {
            return Err(GatewayError::NotFound { what: what.into() });
        }
        if status == reqwest::StatusCode::CONFLICT || code.as_deref() == Some(UNIQUE_VIOLATION) {
            return Err(GatewayError::Conflict { message });
        }

        Err(GatewayError::Api {
            status: status.as_u16(),
            message,
            code,
        })
    }
}

//! Sequential serial-number issuance.
//!
//! Issuance is a read-increment-insert sequence with no transaction
//! around it, so two concurrent issuers can compute the same candidate
//! and one insert will hit the unique constraint. What happens then is an
//! explicit policy choice, not an implicit fallback: see
//! [`ConflictPolicy`].

use chrono::{Datelike, Utc};
use serde::Deserialize;

use receipt_cloud_core::{format_serial, trailing_number, year_prefix, SerialRecord};
use receipt_cloud_gateway::{Gateway, GatewayError};

use crate::error::ClientError;

pub(crate) const SERIAL_TABLE: &str = "serial_numbers";

/// What to do when the insert step of issuance collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Trade correctness for availability: return a provisional serial
    /// built from the last four digits of the current millisecond
    /// timestamp. The fallback is not re-checked for uniqueness and is
    /// not inserted; callers must treat it as provisional. Under this
    /// policy issuance never fails.
    TimestampFallback,

    /// Trade availability for correctness: re-read the latest serial and
    /// re-attempt the insert, surfacing an error once `max_attempts` is
    /// exhausted.
    Retry {
        /// Total attempts before giving up.
        max_attempts: u32,
    },
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self::TimestampFallback
    }
}

#[derive(Debug, Deserialize)]
struct SerialOnly {
    serial_number: String,
}

/// Issues `YYYY-N-NNNN` serial numbers for the current year.
#[derive(Debug, Clone)]
pub struct SerialIssuer {
    gateway: Gateway,
    policy: ConflictPolicy,
}

impl SerialIssuer {
    /// Create an issuer with the default [`ConflictPolicy::TimestampFallback`].
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self::with_policy(gateway, ConflictPolicy::default())
    }

    /// Create an issuer with an explicit conflict policy.
    #[must_use]
    pub fn with_policy(gateway: Gateway, policy: ConflictPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Issue the next serial number and record it.
    ///
    /// Reads the most recently created serial of the current year,
    /// increments its trailing number (starting at 1 for a fresh year)
    /// and inserts a new row carrying `customer_name` and `amount`.
    ///
    /// # Errors
    ///
    /// Under [`ConflictPolicy::TimestampFallback`] this never fails; every
    /// failure degrades to the provisional timestamp serial. Under
    /// [`ConflictPolicy::Retry`] backend errors surface, and exhausting
    /// the attempts yields [`ClientError::SerialConflict`].
    pub async fn issue(&self, customer_name: &str, amount: f64) -> Result<String, ClientError> {
        let year = Utc::now().year();
        match self.policy {
            ConflictPolicy::TimestampFallback => {
                Ok(self.issue_or_fall_back(year, customer_name, amount).await)
            }
            ConflictPolicy::Retry { max_attempts } => {
                self.issue_with_retry(year, customer_name, amount, max_attempts)
                    .await
            }
        }
    }

    /// Whether a serial number is already recorded.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails; an absent
    /// serial is `Ok(false)`, not an error.
    pub async fn exists(&self, serial: &str) -> Result<bool, ClientError> {
        let query = [("serial_number", format!("eq.{serial}"))];
        match self
            .gateway
            .select_one::<SerialOnly>(SERIAL_TABLE, &query)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The most recently issued serial records, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails.
    pub async fn recent(&self, limit: u32) -> Result<Vec<SerialRecord>, ClientError> {
        let query = [
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        Ok(self.gateway.select(SERIAL_TABLE, &query).await?)
    }

    async fn issue_or_fall_back(&self, year: i32, customer_name: &str, amount: f64) -> String {
        let candidate = match self.next_candidate(year).await {
            Ok(candidate) => candidate,
            Err(error) => {
                tracing::warn!(%error, "serial lookup failed, using timestamp fallback");
                return fallback_serial(year);
            }
        };

        match self.record(&candidate, customer_name, amount).await {
            Ok(()) => {
                tracing::debug!(serial = %candidate, "issued serial");
                candidate
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    candidate = %candidate,
                    "serial insert failed, using timestamp fallback"
                );
                fallback_serial(year)
            }
        }
    }

    async fn issue_with_retry(
        &self,
        year: i32,
        customer_name: &str,
        amount: f64,
        max_attempts: u32,
    ) -> Result<String, ClientError> {
        for attempt in 1..=max_attempts {
            let candidate = self.next_candidate(year).await?;
            match self.record(&candidate, customer_name, amount).await {
                Ok(()) => {
                    tracing::debug!(serial = %candidate, attempt, "issued serial");
                    return Ok(candidate);
                }
                Err(error) if error.is_conflict() => {
                    tracing::debug!(candidate = %candidate, attempt, "serial collided, re-reading");
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(ClientError::SerialConflict {
            attempts: max_attempts,
        })
    }

    /// Compute the next free-looking serial for `year` from the latest row.
    async fn next_candidate(&self, year: i32) -> Result<String, GatewayError> {
        let query = [
            ("serial_number", format!("like.{}*", year_prefix(year))),
            ("order", "created_at.desc".to_string()),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<SerialOnly> = self
            .gateway
            .select_columns(SERIAL_TABLE, "serial_number", &query)
            .await?;

        let next = rows
            .first()
            .and_then(|row| trailing_number(&row.serial_number))
            .map_or(1, |n| n + 1);

        Ok(format_serial(year, next))
    }

    async fn record(
        &self,
        serial: &str,
        customer_name: &str,
        amount: f64,
    ) -> Result<(), GatewayError> {
        let record = SerialRecord {
            serial_number: serial.to_string(),
            customer_name: customer_name.to_string(),
            amount,
            created_at: None,
        };
        self.gateway.insert(SERIAL_TABLE, &record).await
    }
}

/// Provisional serial from the last four digits of the ms timestamp.
fn fallback_serial(year: i32) -> String {
    let tail = Utc::now().timestamp_millis().rem_euclid(10_000);
    format!("{}{tail:04}", year_prefix(year))
}

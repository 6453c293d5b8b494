//! Storage of full receipt records.
//!
//! Receipts live in the same backend table as bare serial rows; saving a
//! receipt upserts on `serial_number`, which is also how a bare row from
//! the issuer gets enriched into a full record later.

use chrono::{DateTime, Utc};
use receipt_cloud_core::{ReceiptRecord, ReceiptStatistics, ReceiptStatus, StatRow};
use receipt_cloud_gateway::Gateway;

use crate::error::ClientError;
use crate::serial::SERIAL_TABLE;

/// CRUD-ish access to receipt records, keyed by serial number.
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    gateway: Gateway,
}

impl ReceiptStore {
    /// Create a receipt store over `gateway`.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Save a receipt, overwriting any existing row with the same serial.
    ///
    /// Unset optional fields keep their documented defaults; a missing
    /// `pdf_generated_at` is stamped with the current time, and
    /// `updated_at` always is.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend write fails.
    pub async fn save(&self, receipt: &ReceiptRecord) -> Result<(), ClientError> {
        tracing::debug!(serial = %receipt.serial_number, "saving receipt");
        let now = Utc::now();

        let mut row = serde_json::to_value(receipt)?;
        if let serde_json::Value::Object(map) = &mut row {
            if receipt.pdf_generated_at.is_none() {
                map.insert("pdf_generated_at".into(), serde_json::json!(now));
            }
            map.insert("updated_at".into(), serde_json::json!(now));
            // The backend owns creation time.
            map.remove("created_at");
        }

        self.gateway
            .upsert(SERIAL_TABLE, &row, "serial_number")
            .await?;
        tracing::debug!(serial = %receipt.serial_number, "receipt saved");
        Ok(())
    }

    /// Fetch one receipt by exact serial number.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails; an absent
    /// serial is `Ok(None)`, not an error.
    pub async fn get_by_serial(&self, serial: &str) -> Result<Option<ReceiptRecord>, ClientError> {
        let query = [("serial_number", format!("eq.{serial}"))];
        match self.gateway.select_one(SERIAL_TABLE, &query).await {
            Ok(receipt) => Ok(Some(receipt)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The most recently created receipts, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails.
    pub async fn recent(&self, limit: u32) -> Result<Vec<ReceiptRecord>, ClientError> {
        let query = [
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        Ok(self.gateway.select(SERIAL_TABLE, &query).await?)
    }

    /// Case-insensitive substring search across customer name, serial
    /// number and phone, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails.
    pub async fn search(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<ReceiptRecord>, ClientError> {
        let any_field = format!(
            "(customer_name.ilike.*{keyword}*,serial_number.ilike.*{keyword}*,customer_phone.ilike.*{keyword}*)"
        );
        let query = [
            ("or", any_field),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        Ok(self.gateway.select(SERIAL_TABLE, &query).await?)
    }

    /// Update a receipt's status (and notes, when given).
    ///
    /// Transitions are not validated; any status may replace any other.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend write fails.
    pub async fn update_status(
        &self,
        serial: &str,
        status: ReceiptStatus,
        notes: Option<&str>,
    ) -> Result<(), ClientError> {
        tracing::debug!(serial, status = status.as_str(), "updating receipt status");
        let mut patch = serde_json::json!({
            "status": status,
            "updated_at": Utc::now(),
        });
        if let (serde_json::Value::Object(map), Some(notes)) = (&mut patch, notes) {
            map.insert("notes".into(), serde_json::json!(notes));
        }

        let query = [("serial_number", format!("eq.{serial}"))];
        self.gateway.update(SERIAL_TABLE, &patch, &query).await?;
        Ok(())
    }

    /// Aggregate statistics over receipts created in the given range
    /// (both bounds inclusive, either optional).
    ///
    /// The backend offers no aggregation here, so rows are fetched and
    /// folded client-side; this degrades linearly with table size.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails.
    pub async fn statistics(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<ReceiptStatistics, ClientError> {
        let mut query = Vec::new();
        if let Some(start) = start {
            query.push(("created_at", format!("gte.{}", start.to_rfc3339())));
        }
        if let Some(end) = end {
            query.push(("created_at", format!("lte.{}", end.to_rfc3339())));
        }

        let rows: Vec<StatRow> = self
            .gateway
            .select_columns(SERIAL_TABLE, "amount,status,created_at", &query)
            .await?;

        Ok(ReceiptStatistics::from_rows(&rows))
    }
}

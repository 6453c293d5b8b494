//! Receipt record types.
//!
//! A serial number starts life as a bare [`SerialRecord`] written by the
//! issuer and is later enriched into a full [`ReceiptRecord`] by the save
//! path. Both live in the same backend table, keyed by `serial_number`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal row written at serial issuance time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialRecord {
    /// The issued serial number, format `YYYY-N-NNNN`.
    pub serial_number: String,

    /// Customer the serial was issued for (may be empty at issuance).
    #[serde(default)]
    pub customer_name: String,

    /// Amount recorded at issuance.
    #[serde(default)]
    pub amount: f64,

    /// When the row was created (set by the backend).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Lifecycle status of a receipt.
///
/// Transitions are deliberately unconstrained: any status may be set to
/// any other via the update path. Whether that should become a real state
/// machine is an open product question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    /// Receipt is valid.
    Active,

    /// Receipt was voided.
    Cancelled,

    /// Receipt lapsed.
    Expired,
}

impl ReceiptStatus {
    /// The wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl Default for ReceiptStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A full receipt record, superset of [`SerialRecord`].
///
/// `serial_number` is the natural key: saving twice with the same serial
/// overwrites the earlier row rather than duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Natural key, format `YYYY-N-NNNN`.
    pub serial_number: String,

    /// Customer name.
    pub customer_name: String,

    /// Customer phone number (empty when not captured).
    #[serde(default)]
    pub customer_phone: String,

    /// Membership card type.
    pub membership_type: String,

    /// Full benefit label of the chosen membership.
    #[serde(default)]
    pub membership_label: String,

    /// Paid amount.
    pub amount: f64,

    /// Contract date, `YYYY-MM-DD`.
    pub contract_date: String,

    /// Staff member who handled the sale.
    #[serde(default)]
    pub handler_name: String,

    /// Public URL of the generated PDF.
    #[serde(default)]
    pub pdf_url: String,

    /// Storage key of the generated PDF.
    #[serde(default)]
    pub pdf_path: String,

    /// PDF size in bytes.
    #[serde(default)]
    pub pdf_size: u64,

    /// When the PDF was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_generated_at: Option<DateTime<Utc>>,

    /// Lifecycle status.
    #[serde(default)]
    pub status: ReceiptStatus,

    /// Free-text notes.
    #[serde(default)]
    pub notes: String,

    /// Arbitrary extra metadata carried with the record.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,

    /// When the row was created (set by the backend).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the row was last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReceiptRecord {
    /// Create a record with the required fields set and everything else
    /// at its documented default.
    #[must_use]
    pub fn new(
        serial_number: impl Into<String>,
        customer_name: impl Into<String>,
        membership_type: impl Into<String>,
        amount: f64,
        contract_date: impl Into<String>,
    ) -> Self {
        Self {
            serial_number: serial_number.into(),
            customer_name: customer_name.into(),
            customer_phone: String::new(),
            membership_type: membership_type.into(),
            membership_label: String::new(),
            amount,
            contract_date: contract_date.into(),
            handler_name: String::new(),
            pdf_url: String::new(),
            pdf_path: String::new(),
            pdf_size: 0,
            pdf_generated_at: None,
            status: ReceiptStatus::Active,
            notes: String::new(),
            metadata: BTreeMap::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

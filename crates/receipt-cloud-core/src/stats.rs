//! Client-side receipt statistics.
//!
//! The backend offers no aggregation to this layer, so statistics are a
//! fold over fetched rows. That degrades linearly with table size, which
//! is acceptable at the volumes this tool sees.

use serde::{Deserialize, Serialize};

use crate::receipt::ReceiptStatus;

/// The projection fetched for statistics: amount, status, creation time.
///
/// `amount` is kept as raw JSON because legacy rows stored it as a string;
/// non-numeric values contribute zero to the totals instead of failing the
/// whole aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct StatRow {
    /// Raw amount value as stored.
    #[serde(default)]
    pub amount: serde_json::Value,

    /// Raw status string as stored.
    #[serde(default)]
    pub status: Option<String>,
}

impl StatRow {
    /// Parse the amount, treating anything non-numeric as zero.
    #[must_use]
    pub fn amount_or_zero(&self) -> f64 {
        match &self.amount {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Aggregated receipt statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptStatistics {
    /// Number of rows in range.
    pub total: u64,

    /// Sum of parseable amounts.
    pub total_amount: f64,

    /// Rows with status `active`.
    pub active: u64,

    /// Rows with status `cancelled`.
    pub cancelled: u64,

    /// `total_amount / total`, or zero when there are no rows.
    pub average_amount: f64,
}

impl ReceiptStatistics {
    /// Fold a set of fetched rows into statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_rows(rows: &[StatRow]) -> Self {
        let total = rows.len() as u64;
        let total_amount: f64 = rows.iter().map(StatRow::amount_or_zero).sum();
        let count_status = |status: ReceiptStatus| {
            rows.iter()
                .filter(|r| r.status.as_deref() == Some(status.as_str()))
                .count() as u64
        };

        Self {
            total,
            total_amount,
            active: count_status(ReceiptStatus::Active),
            cancelled: count_status(ReceiptStatus::Cancelled),
            average_amount: if total > 0 {
                total_amount / total as f64
            } else {
                0.0
            },
        }
    }
}

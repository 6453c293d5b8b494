//! Application configuration record.
//!
//! One deployment holds at most one [`AppConfig`] row, stored under the
//! fixed id [`CONFIG_ID`] and replaced wholesale on every save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed identifier of the singleton configuration row.
///
/// Using a constant id plus upsert-on-conflict guarantees at most one row
/// per deployment.
pub const CONFIG_ID: &str = "default-config";

/// A purchasable membership option shown on the receipt form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipOption {
    /// Display label, e.g. "Gold (annual)".
    pub label: String,

    /// Price in the deployment's currency unit.
    pub price: f64,
}

/// The shared settings blob for one deployment.
///
/// Every field is display text or an asset URL consumed by the receipt
/// renderer; this layer stores and retrieves it without interpretation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Browser/application title.
    pub app_title: String,

    /// Brand name printed in the letterhead.
    pub brand_name: String,

    /// Secondary brand line under the name.
    pub brand_sub: String,

    /// Logo image URL (empty when unset).
    #[serde(default)]
    pub logo_url: String,

    /// Seal image URL (empty when unset).
    #[serde(default)]
    pub seal_url: String,

    /// Text rendered inside the seal.
    pub seal_text: String,

    /// Receipt main title.
    pub title: String,

    /// Receipt subtitle.
    pub sub_title: String,

    /// Introductory paragraph.
    pub intro_text: String,

    /// Confirmation paragraph.
    pub confirm_text: String,

    /// Footer slogan line.
    pub footer_slogan: String,

    /// Membership options offered on the form.
    #[serde(default)]
    pub membership_options: Vec<MembershipOption>,

    /// Names of staff members who may be recorded as handler.
    #[serde(default)]
    pub handlers: Vec<String>,

    /// When the row was first created (set by the backend).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the row was last overwritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

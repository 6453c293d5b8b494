//! User and role types for the session layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capability tier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May change settings and everything below.
    Admin,

    /// May generate receipts.
    User,
}

/// The session projection of a backend user row.
///
/// The password hash never appears here; it is compared inside the login
/// path and dropped before this struct is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend row id.
    pub id: i64,

    /// Unique login name.
    pub username: String,

    /// Capability tier.
    pub role: Role,

    /// Human-friendly name for display (falls back to `username` in UIs).
    #[serde(default)]
    pub display_name: Option<String>,

    /// Only active users may authenticate.
    pub is_active: bool,

    /// Last successful login, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,

    /// When the account was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user holds the admin tier.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

//! Login and session handling.
//!
//! A session is one authenticated [`User`] held in an in-memory slot and
//! mirrored to a [`SessionStore`] so it survives process restarts. The
//! manager is an explicit context object: nothing here is a process-wide
//! global, and two managers with different stores are fully independent.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use receipt_cloud_core::{Role, User};
use receipt_cloud_gateway::Gateway;

use crate::crypto;
use crate::error::ClientError;

const USERS_TABLE: &str = "users";

/// Durable slot holding at most one persisted session.
///
/// `load` must treat a missing or corrupt value as "no session";
/// `save` and `clear` are best-effort and must not fail the login or
/// logout that triggered them.
pub trait SessionStore: Send + Sync {
    /// Read the persisted session, if one parses.
    fn load(&self) -> Option<User>;

    /// Persist the session, replacing any previous one.
    fn save(&self, user: &User);

    /// Drop the persisted session.
    fn clear(&self);
}

/// Session slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<User> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "persisted session is corrupt");
                None
            }
        }
    }

    fn save(&self, user: &User) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let result = serde_json::to_string(user)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.path, json));
        if let Err(error) = result {
            tracing::warn!(%error, path = %self.path.display(), "failed to persist session");
        }
    }

    fn clear(&self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            if error.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(%error, path = %self.path.display(), "failed to clear session");
            }
        }
    }
}

/// In-memory session slot, for tests and ephemeral processes.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<User>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<User> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, user: &User) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// The full backend user row, including the hash the projection drops.
#[derive(Debug, Deserialize)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    role: Role,
    #[serde(default)]
    display_name: Option<String>,
    is_active: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Session context: verifies credentials, holds the current user, mirrors
/// it to a [`SessionStore`] and answers capability questions.
pub struct SessionManager<S: SessionStore> {
    gateway: Gateway,
    store: S,
    current: Mutex<Option<User>>,
}

impl<S: SessionStore> SessionManager<S> {
    /// Create a manager over `gateway`, persisting sessions to `store`.
    pub fn new(gateway: Gateway, store: S) -> Self {
        Self {
            gateway,
            store,
            current: Mutex::new(None),
        }
    }

    /// Verify credentials and open a session.
    ///
    /// The lookup requires `is_active = true`, so disabled accounts fail
    /// exactly like unknown ones. A failed `last_login_at` stamp is
    /// logged, never fatal.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidCredentials`] for an unknown username, an
    /// inactive account or a wrong password (one message for all three);
    /// other [`ClientError`]s for backend failures.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ClientError> {
        tracing::debug!(username, "verifying credentials");
        let query = [
            ("username", format!("eq.{username}")),
            ("is_active", "eq.true".to_string()),
        ];
        let row: UserRow = match self.gateway.select_one(USERS_TABLE, &query).await {
            Ok(row) => row,
            Err(e) if e.is_not_found() => {
                tracing::debug!(username, "unknown or inactive user");
                return Err(ClientError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let supplied = crypto::sha256_hex(password);
        if !crypto::constant_time_eq(&supplied, &row.password_hash) {
            tracing::debug!(username, "password mismatch");
            return Err(ClientError::InvalidCredentials);
        }

        let now = Utc::now();
        let stamp = serde_json::json!({ "last_login_at": now });
        let filter = [("id", format!("eq.{}", row.id))];
        if let Err(error) = self.gateway.update(USERS_TABLE, &stamp, &filter).await {
            tracing::warn!(%error, username, "failed to record last login time");
        }

        let user = User {
            id: row.id,
            username: row.username,
            role: row.role,
            display_name: row.display_name,
            is_active: row.is_active,
            last_login_at: Some(now),
            created_at: row.created_at,
        };

        *self.slot() = Some(user.clone());
        self.store.save(&user);
        tracing::debug!(username = %user.username, "login succeeded");
        Ok(user)
    }

    /// Close the session, clearing both the slot and the mirror.
    ///
    /// No backend call is made; an already-anonymous session is fine.
    pub fn logout(&self) {
        *self.slot() = None;
        self.store.clear();
        tracing::debug!("logged out");
    }

    /// The current user: the in-memory slot, else a lazy restore from the
    /// persisted mirror (cached on success), else `None`.
    pub fn current_user(&self) -> Option<User> {
        let mut slot = self.slot();
        if slot.is_none() {
            *slot = self.store.load();
        }
        slot.clone()
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Whether the current user holds the admin tier.
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }

    /// Whether the current user may open the settings screen.
    ///
    /// Currently identical to [`Self::is_admin`]; the two-tier role model
    /// leaves room for a finer capability later.
    pub fn can_access_settings(&self) -> bool {
        self.is_admin()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<User>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Client SDK for the hosted receipt/membership-letter backend.
//!
//! This crate is the thin integration layer a receipt generator UI calls:
//! config persistence, sequential serial-number issuance, receipt record
//! storage, artifact upload/download and a minimal login/session layer.
//! All durability, querying and access control live in the managed
//! backend; every operation here is a light call-through with validation
//! and logging.
//!
//! # Example
//!
//! ```no_run
//! use receipt_cloud::{MemorySessionStore, ReceiptCloud};
//! use receipt_cloud_gateway::Gateway;
//!
//! # async fn example() -> Result<(), receipt_cloud::ClientError> {
//! let gateway = Gateway::new("https://project.example.co", "anon-key");
//! let cloud = ReceiptCloud::new(gateway, MemorySessionStore::default());
//!
//! let user = cloud.session.login("alice", "hunter2").await?;
//! assert!(cloud.session.is_authenticated());
//!
//! let serial = cloud.serials.issue(&user.username, 1980.0).await?;
//! println!("issued {serial}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config_store;
mod crypto;
mod error;
mod files;
mod receipts;
mod serial;
mod session;

pub use config_store::ConfigStore;
pub use error::ClientError;
pub use files::{FileStore, StoredFile, IMAGE_FOLDER, PDF_FOLDER};
pub use receipts::ReceiptStore;
pub use serial::{ConflictPolicy, SerialIssuer};
pub use session::{FileSessionStore, MemorySessionStore, SessionManager, SessionStore};

pub use receipt_cloud_core::{
    AppConfig, MembershipOption, ReceiptRecord, ReceiptStatistics, ReceiptStatus, Role,
    SerialRecord, User,
};
pub use receipt_cloud_gateway::{Gateway, GatewayConfig, GatewayError};

/// The full SDK surface bundled over one gateway.
///
/// Each component can also be constructed on its own; this struct exists
/// for callers that want everything wired identically.
pub struct ReceiptCloud<S: SessionStore = FileSessionStore> {
    /// Singleton settings persistence.
    pub config: ConfigStore,

    /// Serial-number issuance.
    pub serials: SerialIssuer,

    /// Receipt record storage.
    pub receipts: ReceiptStore,

    /// Artifact upload/download.
    pub files: FileStore,

    /// Login and capability checks.
    pub session: SessionManager<S>,
}

impl<S: SessionStore> ReceiptCloud<S> {
    /// Bundle all components over one gateway and session store.
    pub fn new(gateway: Gateway, session_store: S) -> Self {
        Self {
            config: ConfigStore::new(gateway.clone()),
            serials: SerialIssuer::new(gateway.clone()),
            receipts: ReceiptStore::new(gateway.clone()),
            files: FileStore::new(gateway.clone()),
            session: SessionManager::new(gateway, session_store),
        }
    }

    /// As [`Self::new`], with an explicit serial conflict policy.
    pub fn with_conflict_policy(
        gateway: Gateway,
        session_store: S,
        policy: ConflictPolicy,
    ) -> Self {
        let mut cloud = Self::new(gateway.clone(), session_store);
        cloud.serials = SerialIssuer::with_policy(gateway, policy);
        cloud
    }
}

impl ReceiptCloud<FileSessionStore> {
    /// Build the SDK from environment variables.
    ///
    /// Reads the gateway settings (see [`GatewayConfig::from_env`]) plus
    /// `RECEIPT_SESSION_FILE` for the persisted session slot (default
    /// `.receipt-cloud/session.json`).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the gateway configuration is
    /// incomplete.
    pub fn from_env() -> Result<Self, ClientError> {
        let gateway = Gateway::from_config(&GatewayConfig::from_env()?);
        let session_path = std::env::var("RECEIPT_SESSION_FILE")
            .unwrap_or_else(|_| ".receipt-cloud/session.json".into());

        Ok(Self::new(gateway, FileSessionStore::new(session_path)))
    }
}

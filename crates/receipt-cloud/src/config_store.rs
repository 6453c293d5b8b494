//! Persistence of the singleton application configuration.

use chrono::Utc;
use receipt_cloud_core::{AppConfig, CONFIG_ID};
use receipt_cloud_gateway::Gateway;

use crate::error::ClientError;

const CONFIG_TABLE: &str = "app_configs";

/// Get/set access to the one shared settings row.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    gateway: Gateway,
}

impl ConfigStore {
    /// Create a config store over `gateway`.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Save the configuration, replacing any previous version wholesale.
    ///
    /// The row id is fixed, so repeated saves overwrite rather than
    /// accumulate.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend write fails.
    pub async fn save(&self, config: &AppConfig) -> Result<(), ClientError> {
        tracing::debug!("saving app config");
        let mut row = serde_json::to_value(config)?;
        if let serde_json::Value::Object(map) = &mut row {
            map.insert("id".into(), serde_json::json!(CONFIG_ID));
            map.insert("updated_at".into(), serde_json::json!(Utc::now()));
            // The backend owns creation time.
            map.remove("created_at");
        }

        self.gateway.upsert(CONFIG_TABLE, &row, "id").await?;
        tracing::debug!("app config saved");
        Ok(())
    }

    /// Load the configuration, or `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails; a missing
    /// row is not an error.
    pub async fn load(&self) -> Result<Option<AppConfig>, ClientError> {
        let query = [("id", format!("eq.{CONFIG_ID}"))];
        match self.gateway.select_one(CONFIG_TABLE, &query).await {
            Ok(config) => Ok(Some(config)),
            Err(e) if e.is_not_found() => {
                tracing::debug!("no app config saved yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

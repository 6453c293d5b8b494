//! Object storage (bucket) operations.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;

use crate::error::GatewayError;
use crate::gateway::Gateway;

/// One entry returned by a bucket listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntry {
    /// Object name, relative to the listed folder.
    pub name: String,

    /// Backend object id, absent for folder placeholders.
    #[serde(default)]
    pub id: Option<String>,

    /// When the object was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Gateway {
    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.base_url)
    }

    /// Upload raw bytes to `bucket` under `path`.
    ///
    /// With `upsert` false a collision on `path` fails closed with
    /// [`GatewayError::Conflict`] instead of overwriting.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a backend error
    /// response.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<String, GatewayError> {
        tracing::debug!(bucket, path, size = bytes.len(), "upload");
        let response = self
            .request(Method::POST, self.object_url(bucket, path))
            .header("Content-Type", content_type)
            .header("Cache-Control", "3600")
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await?;

        let what = format!("{bucket}/{path}");
        self.check(response, &what).await?;
        Ok(path.to_string())
    }

    /// Download an object's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the object does not exist,
    /// or any other [`GatewayError`] on failure.
    pub async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, GatewayError> {
        tracing::debug!(bucket, path, "download");
        let response = self
            .request(Method::GET, self.object_url(bucket, path))
            .send()
            .await?;

        let what = format!("{bucket}/{path}");
        let response = self.check(response, &what).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Remove a batch of objects from `bucket`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a backend error
    /// response.
    pub async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), GatewayError> {
        tracing::debug!(bucket, count = paths.len(), "remove");
        let url = format!("{}/storage/v1/object/{bucket}", self.base_url);
        let response = self
            .request(Method::DELETE, url)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;

        self.check(response, bucket).await?;
        Ok(())
    }

    /// List objects under `folder`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a backend error
    /// response.
    pub async fn list(
        &self,
        bucket: &str,
        folder: &str,
        limit: u32,
    ) -> Result<Vec<ObjectEntry>, GatewayError> {
        tracing::debug!(bucket, folder, "list");
        let url = format!("{}/storage/v1/object/list/{bucket}", self.base_url);
        let response = self
            .request(Method::POST, url)
            .json(&serde_json::json!({
                "prefix": folder,
                "limit": limit,
                "offset": 0,
                "sortBy": { "column": "created_at", "order": "desc" },
            }))
            .send()
            .await?;

        let response = self.check(response, bucket).await?;
        Ok(response.json().await?)
    }

    /// The public URL of an object. Pure string assembly, no request.
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }
}

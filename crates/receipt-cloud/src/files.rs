//! Upload and retrieval of generated artifacts (PDFs, images).
//!
//! Caller-supplied filenames never become storage keys: they may carry
//! non-ASCII characters the storage layer rejects, and two exports of the
//! same receipt would collide. Keys are `{ms timestamp}_{6-char random
//! suffix}{original extension}`, optionally under a logical folder.

use chrono::Utc;
use receipt_cloud_gateway::{Gateway, ObjectEntry};

use crate::error::ClientError;

/// Folder prefix for generated PDFs.
pub const PDF_FOLDER: &str = "pdfs";

/// Folder prefix for generated images.
pub const IMAGE_FOLDER: &str = "images";

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage key in the bucket.
    pub path: String,

    /// Public URL resolving to the object.
    pub public_url: String,
}

/// File transfer against the gateway's default bucket.
#[derive(Debug, Clone)]
pub struct FileStore {
    gateway: Gateway,
}

impl FileStore {
    /// Create a file store over `gateway`.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Upload bytes under a generated collision-resistant key.
    ///
    /// Only the extension of `original_name` survives into the key. The
    /// upload refuses to overwrite: a key collision fails closed rather
    /// than clobbering the earlier object.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the upload or URL resolution fails.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
        content_type: &str,
    ) -> Result<StoredFile, ClientError> {
        self.upload_to(None, bytes, original_name, content_type)
            .await
    }

    /// Upload a generated PDF under the `pdfs/` folder.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the upload fails.
    pub async fn upload_pdf(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
    ) -> Result<StoredFile, ClientError> {
        self.upload_to(Some(PDF_FOLDER), bytes, original_name, "application/pdf")
            .await
    }

    /// Upload a generated image under the `images/` folder.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the upload fails.
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
    ) -> Result<StoredFile, ClientError> {
        self.upload_to(Some(IMAGE_FOLDER), bytes, original_name, "image/png")
            .await
    }

    /// Download an object's bytes, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails.
    pub async fn download(&self, path: &str) -> Result<Option<Vec<u8>>, ClientError> {
        match self
            .gateway
            .download(self.gateway.default_bucket(), path)
            .await
        {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a batch of objects.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend write fails.
    pub async fn remove(&self, paths: &[String]) -> Result<(), ClientError> {
        self.gateway
            .remove(self.gateway.default_bucket(), paths)
            .await?;
        Ok(())
    }

    /// List objects under `folder`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the backend read fails.
    pub async fn list(&self, folder: &str, limit: u32) -> Result<Vec<ObjectEntry>, ClientError> {
        Ok(self
            .gateway
            .list(self.gateway.default_bucket(), folder, limit)
            .await?)
    }

    /// The public URL for a stored object. No request is made.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        self.gateway
            .public_url(self.gateway.default_bucket(), path)
    }

    async fn upload_to(
        &self,
        folder: Option<&str>,
        bytes: Vec<u8>,
        original_name: &str,
        content_type: &str,
    ) -> Result<StoredFile, ClientError> {
        let key = safe_object_name(original_name);
        let path = match folder {
            Some(folder) => format!("{folder}/{key}"),
            None => key,
        };
        tracing::debug!(original_name, path = %path, size = bytes.len(), "uploading file");

        let stored = self
            .gateway
            .upload(
                self.gateway.default_bucket(),
                &path,
                bytes,
                content_type,
                false,
            )
            .await?;

        Ok(StoredFile {
            public_url: self.public_url(&stored),
            path: stored,
        })
    }
}

/// Build a collision-resistant object name keeping only the extension.
fn safe_object_name(original_name: &str) -> String {
    let ext = original_name
        .rfind('.')
        .map(|i| &original_name[i..])
        .unwrap_or_default();
    let timestamp = Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().simple().to_string();

    format!("{timestamp}_{}{ext}", &random[..6])
}

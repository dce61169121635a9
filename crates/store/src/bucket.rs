//! REST client for an object storage bucket.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::rest;

/// HTTP client for a single storage bucket.
#[derive(Debug, Clone)]
pub struct StorageBucket {
    client: reqwest::Client,
    config: StoreConfig,
    bucket: String,
}

impl StorageBucket {
    pub fn new(config: StoreConfig, bucket: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), config, bucket)
    }

    pub fn with_client(client: reqwest::Client, config: StoreConfig, bucket: impl Into<String>) -> Self {
        Self {
            client,
            config,
            bucket: bucket.into(),
        }
    }

    /// Upload (or overwrite) the object at `path`.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let size = bytes.len();
        let request = self
            .client
            .post(self.object_url(path))
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(bytes);

        let response = rest::authorize(request, &self.config, None).send().await?;
        rest::check_status(response).await?;
        tracing::debug!(bucket = %self.bucket, path, size, "Uploaded object");
        Ok(())
    }

    /// Remove the objects at `paths`. Missing objects are not an error.
    pub async fn remove(&self, paths: &[String]) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.config.endpoint(&format!("/storage/v1/object/{}", self.bucket)))
            .json(&serde_json::json!({ "prefixes": paths }));

        let response = rest::authorize(request, &self.config, None).send().await?;
        rest::check_status(response).await?;
        tracing::debug!(bucket = %self.bucket, count = paths.len(), "Removed objects");
        Ok(())
    }

    /// Public URL for the object at `path`.
    pub fn public_url(&self, path: &str) -> String {
        self.config.endpoint(&format!(
            "/storage/v1/object/public/{}/{}",
            self.bucket, path
        ))
    }

    fn object_url(&self, path: &str) -> String {
        self.config
            .endpoint(&format!("/storage/v1/object/{}/{}", self.bucket, path))
    }
}

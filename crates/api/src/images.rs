//! Where processed dish photos are kept.
//!
//! Objects are addressed by their bucket path (`dishes/{key}.jpg`); both
//! stores hand back a public URL whose tail is that path, so
//! [`object_path_from_url`](dishbook_core::storage::object_path_from_url)
//! recovers it for deletion.

use std::path::PathBuf;

use async_trait::async_trait;
use dishbook_core::photo::IMAGE_CONTENT_TYPE;
use dishbook_store::StorageBucket;

use crate::error::{AppError, AppResult};

/// URL prefix under which [`LocalImageStore`] objects are served.
pub const LOCAL_IMAGE_ROUTE: &str = "/images";

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store (or overwrite) a JPEG at `path` and return its public URL.
    async fn put(&self, path: &str, bytes: Vec<u8>) -> AppResult<String>;

    /// Delete the object at `path`. Missing objects are not an error.
    async fn remove(&self, path: &str) -> AppResult<()>;
}

/// Photos on the local filesystem, served by the API server itself.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url: String = public_base_url.into();
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn file_path(&self, path: &str) -> AppResult<PathBuf> {
        if path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
            return Err(AppError::BadRequest(format!("Invalid object path '{path}'")));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> AppResult<String> {
        let file = self.file_path(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
        }
        tokio::fs::write(&file, &bytes)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        tracing::debug!(path, size = bytes.len(), "Stored image locally");
        Ok(format!("{}{LOCAL_IMAGE_ROUTE}/{path}", self.public_base_url))
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        let file = self.file_path(path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::InternalError(e.to_string())),
        }
    }
}

/// Photos in the hosted store's public bucket.
#[derive(Debug, Clone)]
pub struct BucketImageStore {
    bucket: StorageBucket,
}

impl BucketImageStore {
    pub fn new(bucket: StorageBucket) -> Self {
        Self { bucket }
    }
}

#[async_trait]
impl ImageStore for BucketImageStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> AppResult<String> {
        self.bucket.upload(path, bytes, IMAGE_CONTENT_TYPE).await?;
        Ok(self.bucket.public_url(path))
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        self.bucket.remove(&[path.to_string()]).await?;
        Ok(())
    }
}

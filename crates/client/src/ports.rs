//! Collaborator seams used by the view controllers.
//!
//! Reads go through [`DishReader`] and writes through [`DishWriter`] so the
//! controllers can run against the hosted store, the bundled API server, or
//! an in-memory fake in tests.

use std::path::Path;

use async_trait::async_trait;
use dishbook_core::dish::Dish;
use dishbook_core::photo::content_type_for;
use dishbook_core::types::DishId;
use dishbook_store::DishTable;

use crate::error::ClientError;
use crate::session::Session;

/// A user-selected image file, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Wrap in-memory bytes; the MIME type is taken from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Validation(format!("Could not read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// A validated create/update request as sent to the mutation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishPayload {
    pub dish_name: String,
    pub ingredients: Vec<String>,
    /// `None` on update keeps the current image.
    pub image: Option<ImageFile>,
}

/// Read access to dish records.
#[async_trait]
pub trait DishReader: Send + Sync {
    /// All dishes, newest first.
    async fn list_dishes(&self, session: &Session) -> Result<Vec<Dish>, ClientError>;

    /// One dish; `Ok(None)` when no record has this id.
    async fn get_dish(&self, session: &Session, id: DishId) -> Result<Option<Dish>, ClientError>;
}

/// Write access through the mutation API.
#[async_trait]
pub trait DishWriter: Send + Sync {
    async fn create_dish(&self, session: &Session, payload: &DishPayload)
        -> Result<Dish, ClientError>;

    async fn update_dish(
        &self,
        session: &Session,
        id: DishId,
        payload: &DishPayload,
    ) -> Result<Dish, ClientError>;

    async fn delete_dish(&self, session: &Session, id: DishId) -> Result<(), ClientError>;
}

/// Reads straight from the hosted store's `dishes` table with the user's
/// access token.
#[derive(Debug, Clone)]
pub struct StoreReader {
    table: DishTable,
}

impl StoreReader {
    pub fn new(table: DishTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl DishReader for StoreReader {
    async fn list_dishes(&self, session: &Session) -> Result<Vec<Dish>, ClientError> {
        Ok(self.table.list(Some(&session.access_token)).await?)
    }

    async fn get_dish(&self, session: &Session, id: DishId) -> Result<Option<Dish>, ClientError> {
        Ok(self.table.get(Some(&session.access_token), id).await?)
    }
}

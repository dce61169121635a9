use std::sync::Arc;

use dishbook_core::storage::DISH_IMAGE_BUCKET;
use dishbook_store::{DishTable, StorageBucket};

use crate::config::ServerConfig;
use crate::images::{BucketImageStore, ImageStore, LocalImageStore};
use crate::repository::{DishRepository, MemoryDishRepository, StoreDishRepository};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Dish records.
    pub dishes: Arc<dyn DishRepository>,
    /// Processed dish photos.
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Pick backends from `config`: the hosted store when configured,
    /// otherwise memory plus the local image directory.
    pub fn from_config(config: ServerConfig) -> Self {
        let dishes: Arc<dyn DishRepository>;
        let images: Arc<dyn ImageStore>;
        match &config.store {
            Some(store) => {
                dishes = Arc::new(StoreDishRepository::new(DishTable::new(store.clone())));
                images = Arc::new(BucketImageStore::new(StorageBucket::new(
                    store.clone(),
                    DISH_IMAGE_BUCKET,
                )));
                tracing::info!(url = %store.url, "Using hosted store for dishes and images");
            }
            None => {
                dishes = Arc::new(MemoryDishRepository::new());
                images = Arc::new(LocalImageStore::new(
                    config.image_dir.clone(),
                    config.public_base_url.clone(),
                ));
                tracing::info!(
                    image_dir = %config.image_dir.display(),
                    "Using in-memory dishes and local image storage"
                );
            }
        }

        Self {
            config: Arc::new(config),
            dishes,
            images,
        }
    }
}


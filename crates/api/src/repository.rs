//! Dish persistence behind the HTTP handlers.
//!
//! [`MemoryDishRepository`] backs local development and tests;
//! [`StoreDishRepository`] writes to the hosted `dishes` table with the
//! service-role key.

use async_trait::async_trait;
use chrono::Utc;
use dishbook_core::dish::{Dish, DishChanges, NewDish};
use dishbook_core::search::sort_newest_first;
use dishbook_core::types::DishId;
use dishbook_store::{DishTable, StoreError};
use tokio::sync::RwLock;

#[async_trait]
pub trait DishRepository: Send + Sync {
    /// All dishes, newest first.
    async fn list(&self) -> Result<Vec<Dish>, StoreError>;

    async fn find_by_id(&self, id: DishId) -> Result<Option<Dish>, StoreError>;

    async fn create(&self, input: &NewDish) -> Result<Dish, StoreError>;

    /// `None` when no dish has this id.
    async fn update(&self, id: DishId, changes: &DishChanges) -> Result<Option<Dish>, StoreError>;

    /// The removed dish, or `None` when no dish has this id.
    async fn delete(&self, id: DishId) -> Result<Option<Dish>, StoreError>;
}

/// Process-local repository. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryDishRepository {
    dishes: RwLock<Vec<Dish>>,
}

impl MemoryDishRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DishRepository for MemoryDishRepository {
    async fn list(&self) -> Result<Vec<Dish>, StoreError> {
        let mut dishes = self.dishes.read().await.clone();
        sort_newest_first(&mut dishes);
        Ok(dishes)
    }

    async fn find_by_id(&self, id: DishId) -> Result<Option<Dish>, StoreError> {
        let dishes = self.dishes.read().await;
        Ok(dishes.iter().find(|dish| dish.id == id).cloned())
    }

    async fn create(&self, input: &NewDish) -> Result<Dish, StoreError> {
        let dish = Dish {
            id: uuid::Uuid::new_v4(),
            dish_name: input.dish_name.clone(),
            ingredients: input.ingredients.clone(),
            image_url: input.image_url.clone(),
            notes: None,
            created_at: Utc::now(),
        };
        self.dishes.write().await.push(dish.clone());
        Ok(dish)
    }

    async fn update(&self, id: DishId, changes: &DishChanges) -> Result<Option<Dish>, StoreError> {
        let mut dishes = self.dishes.write().await;
        Ok(dishes.iter_mut().find(|dish| dish.id == id).map(|dish| {
            changes.apply_to(dish);
            dish.clone()
        }))
    }

    async fn delete(&self, id: DishId) -> Result<Option<Dish>, StoreError> {
        let mut dishes = self.dishes.write().await;
        let index = dishes.iter().position(|dish| dish.id == id);
        Ok(index.map(|i| dishes.remove(i)))
    }
}

/// Repository over the hosted `dishes` table.
#[derive(Debug, Clone)]
pub struct StoreDishRepository {
    table: DishTable,
}

impl StoreDishRepository {
    pub fn new(table: DishTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl DishRepository for StoreDishRepository {
    async fn list(&self) -> Result<Vec<Dish>, StoreError> {
        self.table.list(None).await
    }

    async fn find_by_id(&self, id: DishId) -> Result<Option<Dish>, StoreError> {
        self.table.get(None, id).await
    }

    async fn create(&self, input: &NewDish) -> Result<Dish, StoreError> {
        self.table.insert(None, input).await
    }

    async fn update(&self, id: DishId, changes: &DishChanges) -> Result<Option<Dish>, StoreError> {
        self.table.update(None, id, changes).await
    }

    async fn delete(&self, id: DishId) -> Result<Option<Dish>, StoreError> {
        self.table.delete(None, id).await
    }
}

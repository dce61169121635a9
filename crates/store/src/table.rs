//! REST client for the `dishes` table.
//!
//! Wraps the PostgREST endpoints under `/rest/v1/dishes` using
//! [`reqwest`]. Every call takes an optional user access token; `None`
//! authenticates with the configured key alone.

use dishbook_core::dish::{Dish, DishChanges, NewDish};
use dishbook_core::types::DishId;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::rest;

/// Path of the dishes table below the store root.
const TABLE_PATH: &str = "/rest/v1/dishes";

/// Ask PostgREST to echo affected rows.
const RETURN_REPRESENTATION: &str = "return=representation";

/// HTTP client for the `dishes` table.
#[derive(Debug, Clone)]
pub struct DishTable {
    client: reqwest::Client,
    config: StoreConfig,
}

impl DishTable {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling, timeouts).
    pub fn with_client(client: reqwest::Client, config: StoreConfig) -> Self {
        Self { client, config }
    }

    /// All dishes, newest first.
    pub async fn list(&self, token: Option<&str>) -> Result<Vec<Dish>, StoreError> {
        let request = self
            .client
            .get(self.config.endpoint(TABLE_PATH))
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let response = rest::authorize(request, &self.config, token).send().await?;
        let dishes: Vec<Dish> = rest::parse_response(response).await?;
        tracing::debug!(count = dishes.len(), "Listed dishes");
        Ok(dishes)
    }

    /// A single dish, or `None` if no row has this id.
    pub async fn get(&self, token: Option<&str>, id: DishId) -> Result<Option<Dish>, StoreError> {
        let request = self
            .client
            .get(self.config.endpoint(TABLE_PATH))
            .query(&[("select", "*".to_string()), ("id", id_filter(id))]);

        let response = rest::authorize(request, &self.config, token).send().await?;
        let rows: Vec<Dish> = rest::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert a dish and return the stored row.
    pub async fn insert(&self, token: Option<&str>, dish: &NewDish) -> Result<Dish, StoreError> {
        let request = self
            .client
            .post(self.config.endpoint(TABLE_PATH))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(dish);

        let response = rest::authorize(request, &self.config, token).send().await?;
        let rows: Vec<Dish> = rest::parse_response(response).await?;
        rows.into_iter().next().ok_or(StoreError::NoRows("insert"))
    }

    /// Replace the editable fields of `id`. `None` if no row has this id.
    pub async fn update(
        &self,
        token: Option<&str>,
        id: DishId,
        changes: &DishChanges,
    ) -> Result<Option<Dish>, StoreError> {
        let request = self
            .client
            .patch(self.config.endpoint(TABLE_PATH))
            .query(&[("id", id_filter(id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(changes);

        let response = rest::authorize(request, &self.config, token).send().await?;
        let rows: Vec<Dish> = rest::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Delete `id` and return the removed row, or `None` if it did not exist.
    pub async fn delete(&self, token: Option<&str>, id: DishId) -> Result<Option<Dish>, StoreError> {
        let request = self
            .client
            .delete(self.config.endpoint(TABLE_PATH))
            .query(&[("id", id_filter(id))])
            .header("Prefer", RETURN_REPRESENTATION);

        let response = rest::authorize(request, &self.config, token).send().await?;
        let rows: Vec<Dish> = rest::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }
}

fn id_filter(id: DishId) -> String {
    format!("eq.{id}")
}

//! HTTP client for the dish mutation API.
//!
//! Wraps the `/api/dishes` endpoints of the mutation API (multipart create
//! and update, delete, and the read endpoints) using [`reqwest`].

use async_trait::async_trait;
use dishbook_core::dish::Dish;
use dishbook_core::ingredients::join_for_payload;
use dishbook_core::types::DishId;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::ports::{DishPayload, DishReader, DishWriter};
use crate::session::Session;

const CREATE_FAILED: &str = "Failed to add dish";
const UPDATE_FAILED: &str = "Failed to update dish";
const DELETE_FAILED: &str = "Failed to delete dish";
const LOAD_FAILED: &str = "Failed to load dish";
const LIST_FAILED: &str = "Failed to load dishes";

/// HTTP client for one mutation API instance.
#[derive(Debug, Clone)]
pub struct DishApi {
    client: reqwest::Client,
    api_url: String,
}

impl DishApi {
    /// * `api_url` - Base URL, e.g. `http://localhost:8000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client carrying the configured URL and request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_client(config.http_client()?, config.api_url.clone()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// `GET /api/dishes`.
    pub async fn list(&self, session: &Session) -> Result<Vec<Dish>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/dishes"))
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        Self::parse_response(response, LIST_FAILED).await
    }

    /// `GET /api/dishes/search?q=`. Server-side twin of the local filter.
    pub async fn search(&self, session: &Session, term: &str) -> Result<Vec<Dish>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/dishes/search"))
            .query(&[("q", term)])
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        Self::parse_response(response, LIST_FAILED).await
    }

    /// `GET /api/dishes/{id}`. A 404 is `Ok(None)`; a success body that
    /// carries an `error` field is a remote error.
    pub async fn get(&self, session: &Session, id: DishId) -> Result<Option<Dish>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/dishes/{id}")))
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status().as_u16();
        let body: Value = Self::parse_response(response, LOAD_FAILED).await?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(ClientError::Remote {
                status: Some(status),
                message: message.to_string(),
            });
        }
        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| ClientError::Transport(format!("{LOAD_FAILED}: {e}")))
    }

    /// `POST /api/dishes` with a multipart form.
    pub async fn create(&self, session: &Session, payload: &DishPayload) -> Result<Dish, ClientError> {
        let response = self
            .client
            .post(self.url("/api/dishes"))
            .bearer_auth(&session.access_token)
            .multipart(Self::form(payload)?)
            .send()
            .await?;
        let dish: Dish = Self::parse_response(response, CREATE_FAILED).await?;
        tracing::info!(dish_id = %dish.id, "Dish created");
        Ok(dish)
    }

    /// `PUT /api/dishes/{id}` with a multipart form.
    pub async fn update(
        &self,
        session: &Session,
        id: DishId,
        payload: &DishPayload,
    ) -> Result<Dish, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/api/dishes/{id}")))
            .bearer_auth(&session.access_token)
            .multipart(Self::form(payload)?)
            .send()
            .await?;
        let dish: Dish = Self::parse_response(response, UPDATE_FAILED).await?;
        tracing::info!(dish_id = %dish.id, "Dish updated");
        Ok(dish)
    }

    /// `DELETE /api/dishes/{id}`.
    pub async fn delete(&self, session: &Session, id: DishId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/dishes/{id}")))
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        Self::ensure_success(response, DELETE_FAILED).await?;
        tracing::info!(dish_id = %id, "Dish deleted");
        Ok(())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn form(payload: &DishPayload) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text("dish_name", payload.dish_name.clone())
            .text("ingredients", join_for_payload(&payload.ingredients));

        if let Some(image) = &payload.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }
        Ok(form)
    }

    /// Returns the response unchanged on success. On failure a JSON
    /// `detail` (or `error`) string becomes [`ClientError::Remote`];
    /// anything else becomes [`ClientError::Transport`] with `fallback`.
    async fn ensure_success(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %body, "Mutation API request failed");
        match failure_message(&body) {
            Some(message) => Err(ClientError::Remote {
                status: Some(status.as_u16()),
                message,
            }),
            None => Err(ClientError::Transport(fallback.to_string())),
        }
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response, fallback).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Transport(format!("{fallback}: {e}")))
    }
}

/// The `detail` or `error` string of a JSON error body.
fn failure_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl DishReader for DishApi {
    async fn list_dishes(&self, session: &Session) -> Result<Vec<Dish>, ClientError> {
        self.list(session).await
    }

    async fn get_dish(&self, session: &Session, id: DishId) -> Result<Option<Dish>, ClientError> {
        self.get(session, id).await
    }
}

#[async_trait]
impl DishWriter for DishApi {
    async fn create_dish(&self, session: &Session, payload: &DishPayload) -> Result<Dish, ClientError> {
        self.create(session, payload).await
    }

    async fn update_dish(
        &self,
        session: &Session,
        id: DishId,
        payload: &DishPayload,
    ) -> Result<Dish, ClientError> {
        self.update(session, id, payload).await
    }

    async fn delete_dish(&self, session: &Session, id: DishId) -> Result<(), ClientError> {
        self.delete(session, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_preferred_over_error() {
        let body = r#"{"detail":"Dish not found","error":"other"}"#;
        assert_eq!(failure_message(body).as_deref(), Some("Dish not found"));
    }

    #[test]
    fn error_used_when_no_detail() {
        assert_eq!(failure_message(r#"{"error":"boom"}"#).as_deref(), Some("boom"));
    }

    #[test]
    fn unparseable_body_has_no_message() {
        assert_eq!(failure_message("<html>502</html>"), None);
        assert_eq!(failure_message(r#"{"detail":""}"#), None);
        assert_eq!(failure_message(r#"{"detail":{"loc":[]}}"#), None);
    }

    #[test]
    fn trailing_slash_trimmed() {
        assert_eq!(DishApi::new("http://localhost:8000/").api_url(), "http://localhost:8000");
    }
}

//! Handlers for the `/api/dishes` resource.
//!
//! Create and update take a multipart form with `dish_name`, `ingredients`
//! (comma-separated text) and an optional `image` file. Photos are
//! re-encoded as JPEG before they are stored.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dishbook_core::dish::{Dish, DishChanges, DishFields, NewDish};
use dishbook_core::error::CoreError;
use dishbook_core::photo::process_image;
use dishbook_core::search::filter_dishes;
use dishbook_core::storage::{object_path, object_path_from_url};
use dishbook_core::types::DishId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /api/dishes/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}

/// An uploaded file from the `image` field.
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Parsed multipart body shared by create and update.
struct DishForm {
    dish_name: Option<String>,
    ingredients: Option<String>,
    image: Option<Upload>,
}

impl DishForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = DishForm {
            dish_name: None,
            ingredients: None,
            image: None,
        };

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "dish_name" => {
                    form.dish_name = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| AppError::BadRequest(e.to_string()))?,
                    );
                }
                "ingredients" => {
                    form.ingredients = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| AppError::BadRequest(e.to_string()))?,
                    );
                }
                "image" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    // Browsers send an empty, unnamed part when no file is chosen.
                    if !file_name.is_empty() && !bytes.is_empty() {
                        form.image = Some(Upload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(form)
    }

    /// Required text fields, validated.
    fn fields(&self) -> AppResult<DishFields> {
        let dish_name = self
            .dish_name
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Missing required 'dish_name' field".into()))?;
        let ingredients = self
            .ingredients
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Missing required 'ingredients' field".into()))?;

        let fields = DishFields::from_form(dish_name, ingredients);
        fields.check()?;
        Ok(fields)
    }
}

/// Re-encode `upload` off the async runtime and store it at `path`.
async fn store_image(state: &AppState, path: &str, upload: Upload) -> AppResult<String> {
    let Upload { file_name, bytes } = upload;
    let original_size = bytes.len();
    let processed = tokio::task::spawn_blocking(move || process_image(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("Image processing task failed: {e}")))??;

    tracing::debug!(
        %file_name,
        original_size,
        processed_size = processed.len(),
        path,
        "Processed dish image",
    );
    state.images.put(path, processed).await
}

/// Best-effort removal of an image no record points at any more.
async fn remove_image(state: &AppState, path: &str) {
    if let Err(e) = state.images.remove(path).await {
        tracing::warn!(path, error = %e, "Failed to remove dish image");
    }
}

async fn find_dish(state: &AppState, id: DishId) -> AppResult<Dish> {
    state
        .dishes
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::dish_not_found(id)))
}

/// GET /api/dishes
pub async fn list_dishes(State(state): State<AppState>) -> AppResult<Json<Vec<Dish>>> {
    let dishes = state.dishes.list().await?;
    Ok(Json(dishes))
}

/// GET /api/dishes/search?q=
///
/// Case-insensitive substring match on the name or any ingredient.
pub async fn search_dishes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Dish>>> {
    let term = params
        .q
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter 'q'".into()))?;
    let dishes = state.dishes.list().await?;
    Ok(Json(filter_dishes(&dishes, &term)))
}

/// GET /api/dishes/{id}
pub async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<DishId>,
) -> AppResult<Json<Dish>> {
    find_dish(&state, id).await.map(Json)
}

/// POST /api/dishes
pub async fn create_dish(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Dish>)> {
    let form = DishForm::read(multipart).await?;
    let fields = form.fields()?;

    let image_url = match form.image {
        Some(upload) => {
            let path = object_path(uuid::Uuid::new_v4());
            Some(store_image(&state, &path, upload).await?)
        }
        None => None,
    };

    let dish = state.dishes.create(&NewDish::new(fields, image_url)).await?;
    tracing::info!(dish_id = %dish.id, dish_name = %dish.dish_name, "Dish created");
    Ok((StatusCode::CREATED, Json(dish)))
}

/// PUT /api/dishes/{id}
///
/// A new image replaces the stored one; without one the current image is
/// kept.
pub async fn update_dish(
    State(state): State<AppState>,
    Path(id): Path<DishId>,
    multipart: Multipart,
) -> AppResult<Json<Dish>> {
    let current = find_dish(&state, id).await?;
    let form = DishForm::read(multipart).await?;
    let fields = form.fields()?;

    let (image_url, replaced) = match form.image {
        Some(upload) => {
            let path = object_path(id);
            let url = store_image(&state, &path, upload).await?;
            let replaced = current
                .image_url
                .as_deref()
                .and_then(object_path_from_url)
                .filter(|old| *old != path);
            (Some(url), replaced)
        }
        None => (None, None),
    };

    let dish = state
        .dishes
        .update(id, &DishChanges::new(fields, image_url))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::dish_not_found(id)))?;
    if let Some(old) = replaced {
        remove_image(&state, &old).await;
    }
    tracing::info!(dish_id = %dish.id, "Dish updated");
    Ok(Json(dish))
}

/// DELETE /api/dishes/{id}
///
/// Removes the record, then its stored image.
pub async fn delete_dish(
    State(state): State<AppState>,
    Path(id): Path<DishId>,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = state
        .dishes
        .delete(id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::dish_not_found(id)))?;
    tracing::info!(dish_id = %id, "Dish deleted");

    if let Some(path) = deleted.image_url.as_deref().and_then(object_path_from_url) {
        remove_image(&state, &path).await;
    }

    Ok(Json(DeletedResponse {
        message: "Dish deleted successfully",
    }))
}

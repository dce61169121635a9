pub mod dishes;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dishes                     list, create (multipart)
/// /dishes/search?q=           search by name or ingredient
/// /dishes/{id}                get, update (multipart), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/dishes", dishes::router())
}

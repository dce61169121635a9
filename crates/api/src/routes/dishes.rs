use axum::routing::get;
use axum::Router;

use crate::handlers::dishes;
use crate::state::AppState;

/// Routes mounted at `/api/dishes`.
///
/// ```text
/// GET, POST           /
/// GET                 /search
/// GET, PUT, DELETE    /{id}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dishes::list_dishes).post(dishes::create_dish))
        .route("/search", get(dishes::search_dishes))
        .route(
            "/{id}",
            get(dishes::get_dish)
                .put(dishes::update_dish)
                .delete(dishes::delete_dish),
        )
}

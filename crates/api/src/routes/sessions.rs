//! Route definitions for map sessions, mounted at `/sessions`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{prediction, sessions};
use crate::state::AppState;

/// ```text
/// POST   /                -> create_session
/// GET    /{id}            -> get_session
/// DELETE /{id}            -> delete_session
/// PUT    /{id}/location   -> update_location
/// POST   /{id}/predict    -> predict_for_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::create_session))
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/{id}/location", put(sessions::update_location))
        .route("/{id}/predict", post(prediction::predict_for_session))
}

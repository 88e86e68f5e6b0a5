//! Route definitions for the district pickers and form metadata.

use axum::routing::get;
use axum::Router;

use crate::handlers::directory;
use crate::state::AppState;

/// ```text
/// GET /cities                    -> list_cities
/// GET /cities/{city}/districts   -> list_districts
/// GET /districts/resolve         -> resolve_district
/// GET /form/options              -> form_options
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(directory::list_cities))
        .route("/cities/{city}/districts", get(directory::list_districts))
        .route("/districts/resolve", get(directory::resolve_district))
        .route("/form/options", get(directory::form_options))
}

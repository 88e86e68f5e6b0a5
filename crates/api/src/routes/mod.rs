pub mod analytics;
pub mod directory;
pub mod health;
pub mod prediction;
pub mod sessions;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /cities                                  list cities
/// /cities/{city}/districts                 districts of a city
/// /districts/resolve?name=                 district → (district_id, city_id)
/// /form/options                            choice sets and numeric ranges
///
/// /predict                                 estimate from a full record (POST)
///
/// /sessions                                create map session (POST)
/// /sessions/{id}                           get, delete
/// /sessions/{id}/location                  map click (PUT)
/// /sessions/{id}/predict                   estimate at the session location (POST)
///
/// /analytics/deals?year=&limit=            deals per district for a year
/// /analytics/deals/yearly                  total deals per year
/// /analytics/deals/preview                 parse an uploaded deal CSV (POST, multipart)
/// /analytics/total-cost?district=          melted total-cost entries
/// /analytics/total-cost/yearly             total cost per year
/// /analytics/warnings                      datasets skipped at startup
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(directory::router())
        .merge(prediction::router())
        .nest("/sessions", sessions::router())
        .nest("/analytics", analytics::router(config.max_upload_bytes))
}

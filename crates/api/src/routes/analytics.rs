//! Route definitions for chart datasets, mounted at `/analytics`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// ```text
/// GET  /deals                -> deals_by_district
/// GET  /deals/yearly         -> yearly_deals
/// POST /deals/preview        -> preview_deal_upload
/// GET  /total-cost           -> total_cost
/// GET  /total-cost/yearly    -> yearly_total_cost
/// GET  /warnings             -> list_warnings
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/deals", get(analytics::deals_by_district))
        .route("/deals/yearly", get(analytics::yearly_deals))
        .route(
            "/deals/preview",
            post(analytics::preview_deal_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/total-cost", get(analytics::total_cost))
        .route("/total-cost/yearly", get(analytics::yearly_total_cost))
        .route("/warnings", get(analytics::list_warnings))
}

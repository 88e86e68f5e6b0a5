//! Handlers for the dashboard charts.
//!
//! Every dataset may be missing. Those endpoints answer 200 with a `null`
//! payload and a warning so the page skips one chart instead of failing.

use aqar_core::analytics::{
    parse_deal_counts, sum_deals, CostEntry, DataWarning, DealCount, YearCost, YearDeals,
};
use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, OptionalDataResponse};
use crate::state::AppState;

/// Rows shown when the caller does not ask for a limit.
pub const DEFAULT_CHART_ROWS: usize = 20;
/// Upper bound on rows in one bar chart.
pub const MAX_CHART_ROWS: usize = 200;

// ---------------------------------------------------------------------------
// GET /analytics/deals?year=&limit=
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DealsQuery {
    /// Defaults to the latest year with data.
    pub year: Option<i32>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DealsChart {
    pub year: i32,
    pub rows: Vec<DealCount>,
}

pub async fn deals_by_district(
    State(state): State<AppState>,
    Query(query): Query<DealsQuery>,
) -> Json<OptionalDataResponse<DealsChart>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_CHART_ROWS)
        .clamp(1, MAX_CHART_ROWS);
    let year = query
        .year
        .or_else(|| state.analytics.years().last().copied());

    let chart = year.and_then(|year| {
        state
            .analytics
            .deals_for(year, Some(limit))
            .map(|rows| DealsChart { year, rows })
    });

    Json(OptionalDataResponse::new(chart, || match year {
        Some(year) => format!("No deal data available for {year}"),
        None => "No deal data available".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// GET /analytics/deals/yearly
// ---------------------------------------------------------------------------

pub async fn yearly_deals(State(state): State<AppState>) -> Json<DataResponse<Vec<YearDeals>>> {
    Json(DataResponse {
        data: state.analytics.yearly_deal_totals(),
    })
}

// ---------------------------------------------------------------------------
// GET /analytics/total-cost?district=
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TotalCostQuery {
    pub district: Option<String>,
}

pub async fn total_cost(
    State(state): State<AppState>,
    Query(query): Query<TotalCostQuery>,
) -> Json<OptionalDataResponse<Vec<CostEntry>>> {
    let entries = state.analytics.total_cost(query.district.as_deref());
    Json(OptionalDataResponse::new(entries, || {
        "Total transaction cost data is not available".to_string()
    }))
}

// ---------------------------------------------------------------------------
// GET /analytics/total-cost/yearly
// ---------------------------------------------------------------------------

pub async fn yearly_total_cost(
    State(state): State<AppState>,
) -> Json<OptionalDataResponse<Vec<YearCost>>> {
    let totals = state.analytics.yearly_cost_totals();
    Json(OptionalDataResponse::new(totals, || {
        "Total transaction cost data is not available".to_string()
    }))
}

// ---------------------------------------------------------------------------
// GET /analytics/warnings
// ---------------------------------------------------------------------------

pub async fn list_warnings(State(state): State<AppState>) -> Json<DataResponse<Vec<DataWarning>>> {
    Json(DataResponse {
        data: state.analytics.warnings().to_vec(),
    })
}

// ---------------------------------------------------------------------------
// POST /analytics/deals/preview
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UploadPreview {
    pub file_name: String,
    pub total_deals: u64,
    pub rows: Vec<DealCount>,
}

/// Parse an uploaded deal-count CSV for charting without storing it.
///
/// The first multipart field is used.
pub async fn preview_deal_upload(
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadPreview>>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;

    let file_name = field.file_name().unwrap_or("upload.csv").to_string();
    if !file_name.to_ascii_lowercase().ends_with(".csv") {
        return Err(AppError::BadRequest(format!(
            "Expected a .csv file, got '{file_name}'"
        )));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut rows = parse_deal_counts(bytes.as_ref())?;
    rows.sort_by(|a, b| b.deals.cmp(&a.deals).then_with(|| a.district.cmp(&b.district)));
    let total_deals = sum_deals(&rows);

    tracing::info!(file_name = %file_name, rows = rows.len(), "Parsed uploaded deal file");

    Ok(Json(DataResponse {
        data: UploadPreview {
            file_name,
            total_deals,
            rows,
        },
    }))
}

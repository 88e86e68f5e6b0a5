//! Handlers for price estimation.
//!
//! Two entry points share one pipeline: a stateless call carrying the full
//! record, and a form submit that takes its coordinates from the caller's
//! map session.

use aqar_core::location::MapLocation;
use aqar_core::pricing::Estimate;
use aqar_core::record::{PropertyRecord, StreetDirection, StreetWidth};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Form fields of a session submit; coordinates come from the session.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyForm {
    pub beds: u32,
    pub livings: u32,
    pub wc: u32,
    pub area: f64,
    pub street_width: StreetWidth,
    pub age: u32,
    pub street_direction: StreetDirection,
    pub ketchen: bool,
    pub furnished: bool,
    pub district: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl PropertyForm {
    pub fn into_record(self, location: MapLocation) -> PropertyRecord {
        PropertyRecord {
            beds: self.beds,
            livings: self.livings,
            wc: self.wc,
            area: self.area,
            street_width: self.street_width,
            age: self.age,
            street_direction: self.street_direction,
            ketchen: self.ketchen,
            furnished: self.furnished,
            lat: location.lat,
            lng: location.lng,
            district: self.district,
            city: self.city,
        }
    }
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<PropertyRecord>,
) -> AppResult<Json<DataResponse<Estimate>>> {
    let estimate = state.estimator()?.estimate(&record)?;
    Ok(Json(DataResponse { data: estimate }))
}

// ---------------------------------------------------------------------------
// POST /sessions/{id}/predict
// ---------------------------------------------------------------------------

pub async fn predict_for_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PropertyForm>,
) -> AppResult<Json<DataResponse<Estimate>>> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;

    let record = form.into_record(session.location);
    let estimate = state.estimator()?.estimate(&record)?;
    Ok(Json(DataResponse { data: estimate }))
}

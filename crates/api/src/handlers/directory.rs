//! Handlers feeding the district pickers and the estimation form's controls.

use aqar_core::directory::ResolvedDistrict;
use aqar_core::location::{MapLocation, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};
use aqar_core::record::{
    StreetDirection, StreetWidth, MAX_AREA_SQM, MAX_BEDS, MAX_LIVINGS, MAX_PROPERTY_AGE, MAX_WC,
    MIN_AREA_SQM,
};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /cities
// ---------------------------------------------------------------------------

pub async fn list_cities(State(state): State<AppState>) -> Json<DataResponse<Vec<String>>> {
    let cities = state
        .directory
        .cities()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(DataResponse { data: cities })
}

// ---------------------------------------------------------------------------
// GET /cities/{city}/districts
// ---------------------------------------------------------------------------

/// Districts of a city in directory order. An unknown city has none.
pub async fn list_districts(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Json<DataResponse<Vec<String>>> {
    let districts = state
        .directory
        .districts_for(&city)
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(DataResponse { data: districts })
}

// ---------------------------------------------------------------------------
// GET /districts/resolve?name=
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ResolvedDistrictResponse {
    pub district: String,
    pub city: String,
    #[serde(flatten)]
    pub ids: ResolvedDistrict,
}

pub async fn resolve_district(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<DataResponse<ResolvedDistrictResponse>>> {
    let ids = state.directory.resolve(&query.name)?;
    let city = state.directory.city_of(&query.name)?.to_string();
    Ok(Json(DataResponse {
        data: ResolvedDistrictResponse {
            district: query.name,
            city,
            ids,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /form/options
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DirectionOption {
    pub value: StreetDirection,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub street_widths: Vec<StreetWidth>,
    pub street_directions: Vec<DirectionOption>,
    pub beds: Range<u32>,
    pub livings: Range<u32>,
    pub wc: Range<u32>,
    pub age: Range<u32>,
    pub area: Range<f64>,
    pub lat: Range<f64>,
    pub lng: Range<f64>,
    pub default_location: MapLocation,
}

/// Choice sets and numeric bounds the form renders its inputs from.
pub async fn form_options() -> Json<DataResponse<FormOptions>> {
    let options = FormOptions {
        street_widths: StreetWidth::ALL.to_vec(),
        street_directions: StreetDirection::ALL
            .into_iter()
            .map(|value| DirectionOption {
                value,
                label: value.label(),
            })
            .collect(),
        beds: Range { min: 0, max: MAX_BEDS },
        livings: Range {
            min: 0,
            max: MAX_LIVINGS,
        },
        wc: Range { min: 0, max: MAX_WC },
        age: Range {
            min: 0,
            max: MAX_PROPERTY_AGE,
        },
        area: Range {
            min: MIN_AREA_SQM,
            max: MAX_AREA_SQM,
        },
        lat: Range {
            min: MIN_LAT,
            max: MAX_LAT,
        },
        lng: Range {
            min: MIN_LNG,
            max: MAX_LNG,
        },
        default_location: MapLocation::default(),
    };
    Json(DataResponse { data: options })
}

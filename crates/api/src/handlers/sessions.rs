//! Handlers for map sessions.

use aqar_core::location::MapLocation;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::session::MapSession;
use crate::state::AppState;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("session {id}"))
}

/// POST /sessions -- start a session on first view.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<DataResponse<MapSession>>) {
    let session = state.sessions.create().await;
    tracing::debug!(session_id = %session.id, "Map session created");
    (StatusCode::CREATED, Json(DataResponse { data: session }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<MapSession>>> {
    let session = state.sessions.get(&id).await.ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /sessions/{id}/location -- a click on the map.
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(location): Json<MapLocation>,
) -> AppResult<Json<DataResponse<MapSession>>> {
    location.validate()?;
    let session = state
        .sessions
        .set_location(&id, location)
        .await
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse { data: session }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

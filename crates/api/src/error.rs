use aqar_core::error::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `aqar_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A resource that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A dependency (e.g. the price model) is not available.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_UNAVAILABLE",
                msg.clone(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a core error into an HTTP status, error code, and message.
///
/// - Input problems (unknown district, validation) are client errors.
/// - Data-file problems mean the requested chart has no data.
/// - Schema and model failures are server faults; their details are logged,
///   not returned.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::UnknownDistrict(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "UNKNOWN_DISTRICT",
            err.to_string(),
        ),
        CoreError::UnknownCity(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "UNKNOWN_CITY",
            err.to_string(),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::MissingDataFile(_) | CoreError::MalformedDataFile { .. } => (
            StatusCode::NOT_FOUND,
            "DATA_UNAVAILABLE",
            err.to_string(),
        ),
        CoreError::SchemaMismatch(_) | CoreError::Model(_) => {
            tracing::error!(error = %err, "Prediction pipeline failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

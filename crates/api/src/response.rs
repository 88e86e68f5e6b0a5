//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Chart endpoints whose
//! dataset may be unavailable add a `warning` next to a `null` payload so the
//! page can skip the chart and show the message instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T | null, "warning": string | null }` for optional datasets.
#[derive(Debug, Serialize)]
pub struct OptionalDataResponse<T: Serialize> {
    pub data: Option<T>,
    pub warning: Option<String>,
}

impl<T: Serialize> OptionalDataResponse<T> {
    /// Wrap `data`, attaching `warning` only when there is nothing to show.
    pub fn new(data: Option<T>, warning: impl FnOnce() -> String) -> Self {
        let warning = data.is_none().then(warning);
        Self { data, warning }
    }
}

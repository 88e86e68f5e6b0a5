#![allow(dead_code)]

use std::path::{Path, PathBuf};

use aqar_core::normalizer::NormalizationMode;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use aqar_api::config::ServerConfig;
use aqar_api::router::build_app_router;
use aqar_api::state::AppState;

/// Repository root (two levels above this crate).
pub fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Build a test `ServerConfig` using the bundled model and datasets.
pub fn test_config() -> ServerConfig {
    let root = repo_root();
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        model_path: root.join("model/price_model.json"),
        data_dir: root.join("data"),
        deal_years: vec![2022, 2023],
        total_cost_file: root.join("data/total_cost.csv"),
        normalization_mode: NormalizationMode::Strict,
        max_upload_bytes: 64 * 1024,
        session_ttl_secs: 3600,
    }
}

/// Build the full application router with all middleware layers, exactly as
/// `main.rs` does.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    build_app_router(AppState::load(config))
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn json_request(app: Router, method: Method, uri: &str, body: &Value) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The Al-Malqa villa form used across the API tests.
pub fn malqa_payload() -> Value {
    serde_json::json!({
        "beds": 3,
        "livings": 1,
        "wc": 2,
        "area": 300.0,
        "street_width": 15,
        "age": 5,
        "street_direction": "north",
        "ketchen": true,
        "furnished": false,
        "lat": 24.7136,
        "lng": 46.6753,
        "district": "حي الملقا"
    })
}

//! Integration tests for the district pickers and form metadata.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, malqa_payload, post_json};

#[tokio::test]
async fn lists_riyadh_as_only_city() {
    let response = get(common::build_test_app(), "/api/v1/cities").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!(["الرياض"]));
}

#[tokio::test]
async fn lists_districts_of_a_city() {
    let uri = "/api/v1/cities/%D8%A7%D9%84%D8%B1%D9%8A%D8%A7%D8%B6/districts";
    let json = body_json(get(common::build_test_app(), uri).await).await;

    let districts = json["data"].as_array().unwrap();
    assert!(districts.iter().any(|d| d == "حي الملقا"));
}

#[tokio::test]
async fn unknown_city_has_no_districts() {
    let json = body_json(get(common::build_test_app(), "/api/v1/cities/Atlantis/districts").await).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn resolves_malqa() {
    let uri = "/api/v1/districts/resolve?name=%D8%AD%D9%8A%20%D8%A7%D9%84%D9%85%D9%84%D9%82%D8%A7";
    let response = get(common::build_test_app(), uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["district_id"], 570);
    assert_eq!(json["data"]["city_id"], 66);
    assert_eq!(json["data"]["city"], "الرياض");
}

#[tokio::test]
async fn resolve_unknown_district_is_unprocessable() {
    let response = get(common::build_test_app(), "/api/v1/districts/resolve?name=NoSuchPlace").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNKNOWN_DISTRICT");
}

#[tokio::test]
async fn form_options_list_every_choice() {
    let json = body_json(get(common::build_test_app(), "/api/v1/form/options").await).await;
    let data = &json["data"];

    assert_eq!(data["street_widths"], serde_json::json!([10, 12, 15, 18, 20, 25]));
    assert_eq!(data["street_directions"].as_array().unwrap().len(), 10);
    assert_eq!(data["street_directions"][0]["value"], "north");
    assert_eq!(data["age"]["max"], 35);
    assert_eq!(data["default_location"]["lat"], 24.7136);
}

#[tokio::test]
async fn advertised_area_bounds_are_accepted_by_predict() {
    let app = common::build_test_app();
    let json = body_json(get(app.clone(), "/api/v1/form/options").await).await;
    let min = json["data"]["area"]["min"].as_f64().unwrap();
    let max = json["data"]["area"]["max"].as_f64().unwrap();
    assert!(min > 0.0);

    for area in [min, max] {
        let mut payload = malqa_payload();
        payload["area"] = area.into();
        let response = post_json(app.clone(), "/api/v1/predict", &payload).await;
        assert_eq!(response.status(), StatusCode::OK, "area {area}");
    }

    let mut payload = malqa_payload();
    payload["area"] = (min / 2.0).into();
    let response = post_json(app, "/api/v1/predict", &payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

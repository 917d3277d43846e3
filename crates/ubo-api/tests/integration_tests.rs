//! # Integration Tests for ubo-api
//!
//! Drives the full router against the six-country fixture in
//! `ubo-core/tests/fixtures`: pages, the category and map endpoints, the
//! home-page update round trip, static downloads, probes and metrics.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

use ubo_api::bootstrap::bootstrap;
use ubo_api::state::{AppConfig, AppState};
use ubo_core::DefaultSelection;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../ubo-core/tests/fixtures")
}

fn state_for(dir: &Path, default_selection: DefaultSelection) -> AppState {
    let mut config = AppConfig::with_data_dir(dir.to_path_buf());
    config.default_selection = default_selection;
    bootstrap(config).unwrap()
}

/// Helper: build the test app over the fixture with metrics disabled.
fn test_app() -> axum::Router {
    ubo_api::app(state_for(&fixtures(), DefaultSelection::Placeholder))
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn update(app: axum::Router, body: Value) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/v1/home/update")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = get(test_app(), "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = get(test_app(), "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Pages --------------------------------------------------------------------

#[tokio::test]
async fn test_home_page_lists_categories() {
    let response = get(test_app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    for i in 0..7 {
        assert!(html.contains(&format!(r#"id="group-{i}-toggle""#)));
    }
    assert!(html.contains("UBO implementation status"));
    assert!(html.contains(r#"id="choropleth""#));
}

#[tokio::test]
async fn test_about_page() {
    let response = get(test_app(), "/about").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("<h1>About UBO Atlas</h1>"));
    assert!(html.contains(r#"href="/static/ubo_atlas_data.csv""#));
}

#[tokio::test]
async fn test_unknown_path_serves_home() {
    let response = get(test_app(), "/does/not/exist").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"id="group-0-toggle""#));
}

// -- Static Downloads ---------------------------------------------------------

#[tokio::test]
async fn test_static_dataset_download() {
    let response = get(test_app(), "/static/ubo_atlas_data.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    let csv = body_string(response).await;
    assert!(csv.starts_with("Country,Country code"));
}

// -- Categories ---------------------------------------------------------------

#[tokio::test]
async fn test_list_categories() {
    let response = get(test_app(), "/v1/categories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert_eq!(categories[3]["index"], 3);
    assert_eq!(categories[3]["toggle_id"], "group-3-toggle");
    assert!(!categories[0]["legend"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_category_out_of_range() {
    let response = get(test_app(), "/v1/categories/7").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_category_non_numeric() {
    let response = get(test_app(), "/v1/categories/paywall").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Maps ---------------------------------------------------------------------

#[tokio::test]
async fn test_placeholder_map() {
    let response = get(test_app(), "/v1/map/placeholder").await;
    assert_eq!(response.status(), StatusCode::OK);
    let figure = body_json(response).await;
    assert_eq!(figure["data"][0]["type"], "choropleth");
    assert!(figure["data"][0].get("z").is_none());
    assert_eq!(figure["layout"]["annotations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_category_map() {
    let response = get(test_app(), "/v1/map/0").await;
    assert_eq!(response.status(), StatusCode::OK);
    let figure = body_json(response).await;
    let trace = &figure["data"][0];
    assert_eq!(trace["z"].as_array().unwrap().len(), 6);
    assert_eq!(trace["locations"][0], "AUT");
    assert_eq!(trace["featureidkey"], "properties.iso_a3");
    assert_eq!(figure["layout"]["geo"]["projection"]["type"], "mercator");
}

#[tokio::test]
async fn test_category_map_out_of_range() {
    let response = get(test_app(), "/v1/map/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmapped_value_is_data_integrity_fault() {
    let dir = tempfile::tempdir().unwrap();
    let results = std::fs::read_to_string(fixtures().join("ubo_atlas_data.csv"))
        .unwrap()
        .replace("Latvia,LVA,implemented,public,no,", "Latvia,LVA,implemented,public,free,");
    std::fs::write(dir.path().join("ubo_atlas_data.csv"), results).unwrap();
    for name in ["ubo_atlas_data_fields.csv", "custom.geo-50m-europe41.json"] {
        std::fs::copy(fixtures().join(name), dir.path().join(name)).unwrap();
    }
    let state = state_for(dir.path(), DefaultSelection::Placeholder);
    let (paywall, _) = state.atlas.registry().by_title("Paywall").unwrap();
    let paywall = paywall.get();
    let app = ubo_api::app(state);

    let response = get(app.clone(), &format!("/v1/map/{paywall}")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "DATA_INTEGRITY");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("Latvia") && message.contains("Paywall") && message.contains("free"));

    // Other categories still render.
    let response = get(app, "/v1/map/0").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Home Update --------------------------------------------------------------

#[tokio::test]
async fn test_initial_update_shows_placeholder() {
    let response = update(test_app(), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["active"], Value::Null);
    assert_eq!(body["open"], json!([false, false, false, false, false, false, false]));
    assert_eq!(body["figure"]["layout"]["annotations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_initial_update_with_first_default() {
    let app = ubo_api::app(state_for(&fixtures(), DefaultSelection::First));
    let body = body_json(update(app, json!({})).await).await;
    assert_eq!(body["active"], 0);
    assert_eq!(body["open"], json!([true, false, false, false, false, false, false]));
}

#[tokio::test]
async fn test_toggle_opens_clicked_category() {
    let app = test_app();
    let body = body_json(update(app.clone(), json!({"trigger": "group-3-toggle"})).await).await;
    assert_eq!(body["active"], 3);
    assert_eq!(body["open"], json!([false, false, false, true, false, false, false]));

    let direct = body_json(get(app, "/v1/map/3").await).await;
    assert_eq!(body["figure"], direct);
}

#[tokio::test]
async fn test_toggle_replaces_previous_selection() {
    let body = body_json(
        update(test_app(), json!({"active": 1, "trigger": "group-5-toggle"})).await,
    )
    .await;
    assert_eq!(body["active"], 5);
    assert_eq!(body["open"].as_array().unwrap().iter().filter(|o| **o == json!(true)).count(), 1);
}

#[tokio::test]
async fn test_click_ignores_stale_previous_index() {
    let response = update(test_app(), json!({"active": 42, "trigger": "group-2-toggle"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["active"], 2);
    assert_eq!(body["open"], json!([false, false, true, false, false, false, false]));
}

#[tokio::test]
async fn test_return_from_about_restores_selection() {
    let app = test_app();
    let first = body_json(update(app.clone(), json!({"trigger": "group-2-toggle"})).await).await;

    let about = get(app.clone(), "/about").await;
    assert_eq!(about.status(), StatusCode::OK);

    let restored = body_json(update(app, json!({"active": first["active"]})).await).await;
    assert_eq!(restored["active"], 2);
    assert_eq!(restored["figure"], first["figure"]);
}

#[tokio::test]
async fn test_malformed_trigger_is_bad_request() {
    let response = update(test_app(), json!({"trigger": "collapse-1"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_out_of_range_trigger_is_rejected() {
    let response = update(test_app(), json!({"trigger": "group-9-toggle"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_out_of_range_active_is_rejected() {
    let response = update(test_app(), json!({"active": 42})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/home/update")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- OpenAPI and Metrics ------------------------------------------------------

#[tokio::test]
async fn test_openapi_document() {
    let response = get(test_app(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"].get("/v1/home/update").is_some());
    assert!(doc["paths"].get("/v1/map/{index}").is_some());
}

#[tokio::test]
async fn test_metrics_endpoint_when_enabled() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let state = state_for(&fixtures(), DefaultSelection::Placeholder).with_metrics(handle);
    let response = get(ubo_api::app(state), "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
}

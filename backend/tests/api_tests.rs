//! HTTP surface tests
//!
//! Drives the router directly with in-process requests.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::*;
use disaster_forecast_backend::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_app(
        AppState {
            predictions: service_with(echo_model()),
        },
        &["http://localhost:5173".to_string()],
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let result_id = response
        .headers()
        .get("x-result-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, result_id, body)
}

fn predict_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/disaster/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_predict_then_retrieve() {
    let app = app();
    let body = json!({
        "coordinates": [
            {"latitude": 13.7563, "longitude": 100.5018},
            {"latitude": 18.7883, "longitude": 98.9853}
        ]
    });

    let (status, result_id, batch) = send(&app, predict_request(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(batch["total_locations"], 2);
    assert_eq!(batch["predictions"][0]["latitude"], 13.7563);
    assert_eq!(batch["predictions"][1]["location"], "18.7883, 98.9853");
    assert!(batch["predictions"][0].get("warnings").is_none());
    assert!(batch["predictions"][0].get("error").is_none());
    assert!(batch["timestamp"].is_string());

    let result_id = result_id.expect("x-result-id header");
    let (status, _, stored) =
        send(&app, get_request(&format!("/api/v1/disaster/result/{}", result_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, batch);
}

#[tokio::test]
async fn test_empty_coordinates_rejected() {
    let (status, _, body) = send(&app(), predict_request(json!({"coordinates": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "coordinates");
}

#[tokio::test]
async fn test_out_of_range_latitude_rejected() {
    let body = json!({"coordinates": [{"latitude": 123.0, "longitude": 0.0}]});
    let (status, _, body) = send(&app(), predict_request(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "coordinates[0]");
}

#[tokio::test]
async fn test_unknown_result_is_not_found() {
    let (status, _, body) = send(&app(), get_request("/api/v1/disaster/result/abc123")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = send(&app(), get_request("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

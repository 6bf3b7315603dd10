mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use common::{answers, HIGHEST_BMI};
use obesity_risk::api::{self, AppState};

fn app() -> Router {
    let predictor = Box::leak(Box::new(common::predictor()));
    api::router(AppState { predictor })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn model_endpoint_lists_features() {
    let request = Request::builder().uri("/api/model").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "logistic");
    assert_eq!(body["feature_names"].as_array().map(Vec::len), Some(26));
}

#[tokio::test]
async fn predict_returns_assessment() {
    let payload = serde_json::to_value(answers(&HIGHEST_BMI)).unwrap();
    let (status, body) = send(app(), post_json("/api/predict", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], "high");
    assert_eq!(body["label"], 1);
    let bmi = body["bmi"].as_f64().unwrap();
    assert!((bmi - 130.0 / (1.70 * 1.70)).abs() < 1e-9);
    assert!(body["assessed_at"].is_string());
}

#[tokio::test]
async fn unknown_binary_category_is_bad_request() {
    let mut payload = serde_json::to_value(answers(&HIGHEST_BMI)).unwrap();
    payload["Gender"] = "Other".into();
    let (status, body) = send(app(), post_json("/api/predict", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("Gender"));
}

//! HTTP API для оценки риска

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::error::PipelineError;
use crate::models::{Classifier, RiskPredictor};
use crate::types::{RiskAssessment, SurveyAnswers};

#[derive(Clone)]
pub struct AppState {
    pub predictor: &'static RiskPredictor,
}

pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = if self.0.is_client_error() {
            (StatusCode::BAD_REQUEST, self.0.to_string())
        } else {
            tracing::error!(detail = %self.0, "prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Prediction failed. Check server logs for details.".to_string(),
            )
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/model", get(model_info))
        .route("/api/predict", post(predict))
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Obesity Risk API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn model_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let model = state.predictor.model();
    Json(json!({
        "kind": model.kind(),
        "feature_names": model.feature_names(),
    }))
}

async fn predict(
    State(state): State<AppState>,
    Json(answers): Json<SurveyAnswers>,
) -> Result<Json<RiskAssessment>, ApiError> {
    tracing::info!(age = answers.age, gender = %answers.gender, "predict request");

    let assessment = state.predictor.assess(&answers)?;
    Ok(Json(assessment))
}

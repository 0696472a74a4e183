//! HTTP handlers exposing the inference pipeline.
//!
//! Routes:
//! - `GET /` welcome message
//! - `POST /predict` launch record → price estimate
//! - `GET /vocabulary` labels the codec accepts, per field
//! - `GET /health` readiness and model version

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::artifacts::SUPPORTED_SCHEMA_VERSION;
use crate::codec::CategoricalField;
use crate::error::{FieldViolation, PipelineError, SchemaError};
use crate::pipeline::InferencePipeline;
use crate::record::LaunchRecord;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Routes with browser access open to any origin, credentials included.
pub fn router(pipeline: Arc<InferencePipeline>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/vocabulary", get(vocabulary))
        .route("/health", get(health))
        .layer(CorsLayer::very_permissive())
        .with_state(pipeline)
}

/// Request failures mapped onto HTTP responses.
#[derive(Debug)]
enum ApiError {
    Schema(SchemaError),
    Pipeline(PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Schema(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "schema_validation",
                    "detail": err.violations,
                })),
            )
                .into_response(),
            ApiError::Pipeline(PipelineError::UnknownCategory { field, value }) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "unknown_category",
                    "field": field.request_key(),
                    "value": value,
                })),
            )
                .into_response(),
            ApiError::Pipeline(PipelineError::Predictor(err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "predictor_failure",
                    "message": err.to_string(),
                })),
            )
                .into_response(),
        }
    }
}

async fn home() -> Json<JsonValue> {
    Json(json!({
        "message": "Welcome to the Launch Price Prediction API! POST a launch record to /predict."
    }))
}

async fn health(State(pipeline): State<Arc<InferencePipeline>>) -> Json<JsonValue> {
    Json(json!({
        "status": "ready",
        "model_version": pipeline.model_version(),
        "schema_version": SUPPORTED_SCHEMA_VERSION,
    }))
}

async fn vocabulary(State(pipeline): State<Arc<InferencePipeline>>) -> Json<JsonValue> {
    let mut out = JsonMap::new();
    for field in CategoricalField::ALL {
        out.insert(
            field.request_key().to_string(),
            json!(pipeline.codec().vocabulary(field).classes()),
        );
    }
    Json(JsonValue::Object(out))
}

async fn predict(
    State(pipeline): State<Arc<InferencePipeline>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);
    let _guard = span.enter();

    let mut response = match run_predict(&pipeline, payload) {
        Ok(price) => {
            tracing::info!(price_million_usd = price, "prediction served");
            Json(json!({ "predicted_price_million_usd": price })).into_response()
        }
        Err(err) => err.into_response(),
    };
    if let Ok(v) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, v);
    }
    response
}

fn run_predict(
    pipeline: &InferencePipeline,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<f64, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::info!("rejected request body: {}", rejection.body_text());
        ApiError::Schema(SchemaError {
            violations: vec![FieldViolation::new("body", rejection.body_text())],
        })
    })?;

    let record = LaunchRecord::from_json(&body).map_err(|err| {
        tracing::info!(
            "schema validation failed: {}",
            err.violations
                .iter()
                .map(|v| format!("{}: {}", v.field, v.message))
                .collect::<Vec<_>>()
                .join("; ")
        );
        ApiError::Schema(err)
    })?;

    match pipeline.predict(&record) {
        Ok(prediction) => Ok(prediction.price_million_usd),
        Err(err @ PipelineError::UnknownCategory { .. }) => {
            tracing::warn!("{}", err);
            Err(ApiError::Pipeline(err))
        }
        Err(err @ PipelineError::Predictor(_)) => {
            tracing::error!(year = record.year, "predictor failed: {}", err);
            Err(ApiError::Pipeline(err))
        }
    }
}

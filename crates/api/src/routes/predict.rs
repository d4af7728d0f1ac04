//! Prediction Route

use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dataset::SensorReading;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Successful prediction body
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// "Faulty" or "Healthy"
    pub prediction: String,
    /// Positive-class probability as a percentage string, e.g. "73.20%"
    pub failure_probability: String,
    pub status: String,
    /// Version tag of the serving model
    pub model_version: String,
}

/// Handle `POST /predict`.
///
/// Malformed payloads (missing fields, non-numeric sensors) are rejected
/// before the estimator runs; inference failures return a 500 with a
/// detail message and the service keeps serving.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SensorReading>, JsonRejection>,
) -> Response {
    let Json(reading) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            debug!("Rejected payload: {}", rejection.body_text());
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    if let Err(message) = validate(&reading) {
        debug!("Rejected reading: {}", message);
        return error_response(StatusCode::BAD_REQUEST, message);
    }

    // Transform-only: the fitted statistics are never updated here
    let features = state.transform.transform(&reading);

    match state.estimator.predict_proba(&features) {
        Ok(probability) => {
            let label = if probability >= 0.5 { "Faulty" } else { "Healthy" };
            Json(PredictionResponse {
                prediction: label.to_string(),
                failure_probability: format!("{:.2}%", probability * 100.0),
                status: "Success".to_string(),
                model_version: state.estimator.meta.version.clone(),
            })
            .into_response()
        }
        Err(e) => {
            error!("Inference failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn validate(reading: &SensorReading) -> Result<(), String> {
    let numerics = [
        ("temperature", reading.temperature),
        ("pressure", reading.pressure),
        ("vibration", reading.vibration),
        ("humidity", reading.humidity),
    ];
    for (name, value) in numerics {
        if !value.is_finite() {
            return Err(format!("{} must be a finite number", name));
        }
    }
    Ok(())
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

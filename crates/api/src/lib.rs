//! Equipment Maintenance Inference Service
//!
//! Loads the fitted transform and champion estimator once at startup and
//! serves fault predictions over HTTP. Both artifacts are read-only after
//! load; the process refuses to start if either is missing.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use feature_pipeline::ColumnTransform;
use model::Estimator;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
mod settings;

pub use error::ApiError;
pub use routes::predict::{PredictionResponse, predict_handler};
pub use settings::ServiceSettings;

/// Application state shared across handlers, immutable after startup
pub struct AppState {
    /// Fitted preprocessing transform (transform-only, never refit)
    pub transform: ColumnTransform,
    /// Champion estimator
    pub estimator: Estimator,
    /// Service version string
    pub version: String,
}

impl AppState {
    /// Wrap already-loaded artifacts (used by tests).
    pub fn new(transform: ColumnTransform, estimator: Estimator) -> Self {
        Self {
            transform,
            estimator,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Load both artifacts from disk. Either one missing is fatal: the
    /// service must not reach the serving state without them.
    pub fn load(preprocessor_path: &Path, model_path: &Path) -> Result<Self, ApiError> {
        let transform = ColumnTransform::load(preprocessor_path)?;
        let estimator = Estimator::load(model_path)?;
        info!(
            "Artifacts loaded: {} features, model {} (CV F1 {:.4})",
            transform.dimension(),
            estimator.meta.version,
            estimator.meta.cv_f1
        );
        Ok(Self::new(transform, estimator))
    }
}

/// Liveness response for `GET /`
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub message: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/predict", post(predict_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness handler
async fn home_handler(State(_state): State<Arc<AppState>>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "Industrial Maintenance Inference API is online".to_string(),
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Load artifacts and serve until shutdown.
pub async fn run_server(settings: &ServiceSettings) -> Result<(), ApiError> {
    let state = Arc::new(AppState::load(
        &settings.preprocessor_path,
        &settings.model_path,
    )?);
    let app = create_router(state);

    info!("Starting inference API on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use dataset::CleanRecord;
    use model::{EstimatorKind, ForestParams, ModelMeta, RandomForest};
    use tower::util::ServiceExt;

    /// Small fitted state: faulty rows run hot.
    fn test_state() -> Arc<AppState> {
        let records: Vec<CleanRecord> = (0..40)
            .map(|i| {
                let faulty = u8::from(i % 2 == 1);
                CleanRecord {
                    temperature: if faulty == 1 { 340.0 + i as f64 } else { 290.0 + i as f64 % 5.0 },
                    pressure: 100.0 + i as f64 % 7.0,
                    vibration: if faulty == 1 { 45.0 } else { 18.0 },
                    humidity: 45.0,
                    equipment: ["Turbine", "Pump"][i % 2].to_string(),
                    location: ["Atlanta", "Chicago"][(i / 2) % 2].to_string(),
                    faulty,
                }
            })
            .collect();

        let transform = ColumnTransform::fit(&records).unwrap();
        let features = transform.transform_all(&records);
        let labels: Vec<u8> = records.iter().map(|r| r.faulty).collect();

        let forest = RandomForest::fit(
            &features,
            &labels,
            &ForestParams {
                n_trees: 15,
                ..ForestParams::default()
            },
        )
        .unwrap();
        let estimator = Estimator::new(
            ModelMeta {
                family: "random_forest".to_string(),
                version: "random_forest-test".to_string(),
                n_features: transform.dimension(),
                cv_f1: 0.95,
                trained_at_ms: 0,
            },
            EstimatorKind::RandomForest(forest),
        );

        Arc::new(AppState::new(transform, estimator))
    }

    fn post_predict(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["message"].as_str().unwrap().contains("online"));
    }

    #[tokio::test]
    async fn test_predict_end_to_end() {
        let app = create_router(test_state());
        let response = app
            .oneshot(post_predict(
                r#"{"temperature":300.0,"pressure":100.0,"vibration":20.0,"humidity":45.0,"equipment":"Turbine","location":"Atlanta"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "Success");
        let prediction = json["prediction"].as_str().unwrap();
        assert!(prediction == "Faulty" || prediction == "Healthy");

        // "NN.NN%" shape
        let probability = json["failure_probability"].as_str().unwrap();
        assert!(probability.ends_with('%'));
        let value: f64 = probability.trim_end_matches('%').parse().unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[tokio::test]
    async fn test_hot_reading_is_faulty() {
        let app = create_router(test_state());
        let response = app
            .oneshot(post_predict(
                r#"{"temperature":360.0,"pressure":103.0,"vibration":45.0,"humidity":45.0,"equipment":"Pump","location":"Chicago"}"#,
            ))
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["prediction"], "Faulty");
    }

    #[tokio::test]
    async fn test_missing_field_rejected_before_inference() {
        let app = create_router(test_state());
        // No 'location'
        let response = app
            .oneshot(post_predict(
                r#"{"temperature":300.0,"pressure":100.0,"vibration":20.0,"humidity":45.0,"equipment":"Turbine"}"#,
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn test_non_numeric_field_rejected() {
        let app = create_router(test_state());
        let response = app
            .oneshot(post_predict(
                r#"{"temperature":"hot","pressure":100.0,"vibration":20.0,"humidity":45.0,"equipment":"Turbine","location":"Atlanta"}"#,
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_level_degrades_not_fails() {
        let app = create_router(test_state());
        let response = app
            .oneshot(post_predict(
                r#"{"temperature":300.0,"pressure":100.0,"vibration":20.0,"humidity":45.0,"equipment":"Reactor","location":"Atlanta"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "Success");
    }

    #[test]
    fn test_missing_artifacts_block_startup() {
        let result = AppState::load(
            Path::new("models/no_such_preprocessor.bin"),
            Path::new("models/no_such_model.bin"),
        );
        assert!(result.is_err());
    }
}

//! Service Error Types

use thiserror::Error;

/// Errors raised by the inference service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transform artifact missing or unreadable at startup
    #[error(transparent)]
    Transform(#[from] feature_pipeline::PipelineError),

    /// Model artifact missing or unreadable at startup, or prediction
    /// failed for a request
    #[error(transparent)]
    Model(#[from] model::ModelError),

    /// Request payload failed validation
    #[error("Invalid sensor payload: {0}")]
    Validation(String),

    /// Could not bind or serve
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    /// Settings failed to load
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

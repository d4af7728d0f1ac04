//! Fault Classifier Library
//!
//! Native tree-ensemble estimators: a bagged random forest and a
//! gradient-boosted-tree classifier, both binary, both serializable via
//! postcard for the serving artifact.

mod boosting;
mod estimator;
mod forest;
pub mod metrics;
mod tree;

pub use boosting::{BoostingParams, GradientBoostedTrees};
pub use estimator::{Estimator, EstimatorKind, ModelMeta};
pub use forest::{ForestParams, RandomForest};
pub use tree::{DecisionTree, TreeParams};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from model training, persistence, and prediction
#[derive(Debug, Error)]
pub enum ModelError {
    /// Persisted model not found at the expected path
    #[error("Model artifact not found: {0}")]
    MissingArtifact(PathBuf),

    /// Artifact encode/decode failure
    #[error("Artifact codec error: {0}")]
    Codec(#[from] postcard::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Training set is empty or single-class
    #[error("Training data is degenerate: {0}")]
    DegenerateData(String),

    /// Feature vector length does not match the trained model
    #[error("Invalid input dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },
}

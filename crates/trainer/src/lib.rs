//! Training Job
//!
//! Offline batch training: loads the processed feature table, weights the
//! rare faulty class by the imbalance ratio, grid-searches the configured
//! model family with stratified k-fold cross-validation on F1, records the
//! run, and persists the champion estimator for serving.

mod job;
mod search;
mod settings;
mod split;
mod tracking;

pub use job::{run_training, TrainingPaths, TrainingReport};
pub use search::{expand_boosting_grid, expand_forest_grid, grid_search, Candidate, SearchOutcome};
pub use settings::{BoostingGrid, ForestGrid, ModelFamily, SharedParams, TrainingConfig};
pub use split::{imbalance_ratio, stratified_kfold, stratified_split};
pub use tracking::{ExperimentLog, RunRecord};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the training job
#[derive(Debug, Error)]
pub enum TrainError {
    /// Parameters file missing or malformed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Model fit or persistence failure
    #[error(transparent)]
    Model(#[from] model::ModelError),

    /// Processed dataset failure
    #[error(transparent)]
    Pipeline(#[from] feature_pipeline::PipelineError),

    /// Run-log serialization failure
    #[error("Run log error: {0}")]
    RunLog(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset unusable for supervised training
    #[error("Training data is degenerate: {0}")]
    DegenerateData(String),

    /// Configured grid expands to nothing
    #[error("Empty hyperparameter grid for {0}")]
    EmptyGrid(String),

    /// Parameters file itself is absent
    #[error("Parameters file not found: {0}")]
    MissingConfig(PathBuf),
}

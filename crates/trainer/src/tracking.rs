//! Experiment Run Log
//!
//! Append-only JSON-lines record of every training run: family, winning
//! hyperparameters, and scores. The model blob itself lands next to the
//! record via the estimator artifact.

use crate::TrainError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One completed training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Human-readable run name, e.g. "grid_search_random_forest"
    pub run_name: String,
    /// Model family that was searched
    pub model_family: String,
    /// Winning hyperparameters
    pub best_params: serde_json::Value,
    /// Winning mean cross-validation F1
    pub best_cv_f1: f64,
    /// F1 on the stratified holdout
    pub holdout_f1: f64,
    /// Path of the persisted model artifact
    pub model_path: String,
    /// Unix millis when the run finished
    pub timestamp_ms: u64,
}

/// Append-only experiment log backed by a JSON-lines file
pub struct ExperimentLog {
    path: PathBuf,
}

impl ExperimentLog {
    /// Log writing to the given file (conventionally
    /// `experiments/runs.jsonl`).
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Append one run record.
    pub fn append(&self, record: &RunRecord) -> Result<(), TrainError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;

        info!("Run '{}' recorded to {}", record.run_name, self.path.display());
        Ok(())
    }

    /// Read back all recorded runs.
    pub fn runs(&self) -> Result<Vec<RunRecord>, TrainError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str(line)?))
            .collect()
    }
}

//! Fitted Column Transform

use crate::encoder::OneHotEncoder;
use crate::error::PipelineError;
use crate::scaler::StandardScaler;
use dataset::{CleanRecord, SensorReading};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Numeric feature columns, in output order
const NUMERIC_FEATURES: [&str; 4] = ["temperature", "pressure", "vibration", "humidity"];

/// Categorical feature columns, in output order
const CATEGORICAL_FEATURES: [&str; 2] = ["equipment", "location"];

/// The fitted preprocessing transform: scaled numeric block followed by
/// one-hot blocks per categorical column.
///
/// Fit exactly once during feature generation, then persisted. Every
/// later use is transform-only; the fitted statistics never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransform {
    scaler: StandardScaler,
    encoder: OneHotEncoder,
}

impl ColumnTransform {
    /// Fit scaler and encoder on cleaned training rows.
    pub fn fit(records: &[CleanRecord]) -> Result<Self, PipelineError> {
        if records.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        let numeric_columns: Vec<Vec<f64>> = vec![
            records.iter().map(|r| r.temperature).collect(),
            records.iter().map(|r| r.pressure).collect(),
            records.iter().map(|r| r.vibration).collect(),
            records.iter().map(|r| r.humidity).collect(),
        ];
        let categorical_columns: Vec<Vec<&str>> = vec![
            records.iter().map(|r| r.equipment.as_str()).collect(),
            records.iter().map(|r| r.location.as_str()).collect(),
        ];

        let transform = Self {
            scaler: StandardScaler::fit(&numeric_columns),
            encoder: OneHotEncoder::fit(&categorical_columns),
        };
        info!(
            "Fitted transform on {} rows ({} features)",
            records.len(),
            transform.dimension()
        );
        Ok(transform)
    }

    /// Produce the feature vector for one reading.
    ///
    /// Unknown categorical levels encode as all-zero indicator blocks and
    /// are logged, matching the encoder's degrade-not-fail policy.
    pub fn transform(&self, reading: &SensorReading) -> Vec<f64> {
        let mut out = self.scaler.transform(&[
            reading.temperature,
            reading.pressure,
            reading.vibration,
            reading.humidity,
        ]);

        for (column, (name, value)) in CATEGORICAL_FEATURES
            .iter()
            .zip([reading.equipment.as_str(), reading.location.as_str()])
            .enumerate()
        {
            if !self.encoder.encode_into(column, value, &mut out) {
                warn!("Unknown {} level '{}', encoding as all zeros", name, value);
            }
        }

        out
    }

    /// Transform a batch of cleaned rows (features only, labels untouched).
    pub fn transform_all(&self, records: &[CleanRecord]) -> Vec<Vec<f64>> {
        records.iter().map(|r| self.transform(&r.reading())).collect()
    }

    /// Length of the produced feature vectors
    pub fn dimension(&self) -> usize {
        NUMERIC_FEATURES.len() + self.encoder.dimension()
    }

    /// Output column names: numeric names then `column_Level` indicators,
    /// in the exact order `transform` emits values.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = NUMERIC_FEATURES.iter().map(|n| n.to_string()).collect();
        for (column, name) in CATEGORICAL_FEATURES.iter().enumerate() {
            for level in self.encoder.levels(column) {
                names.push(format!("{}_{}", name, level));
            }
        }
        names
    }

    /// Persist the fitted transform as an opaque artifact.
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = postcard::to_allocvec(self)?;
        std::fs::write(path, bytes)?;
        info!("Transform saved to {}", path.display());
        Ok(())
    }

    /// Load a persisted transform, read-only.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::MissingArtifact(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        Ok(postcard::from_bytes(&bytes)?)
    }
}

//! Serving Estimator
//!
//! Wraps the winning classifier, whichever family it came from, behind a
//! single serializable artifact with training metadata.

use crate::boosting::GradientBoostedTrees;
use crate::forest::RandomForest;
use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Metadata recorded alongside the trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Model family name ("random_forest" | "gradient_boosting")
    pub family: String,
    /// Version tag surfaced in prediction responses
    pub version: String,
    /// Feature dimension the model expects
    pub n_features: usize,
    /// Winning mean cross-validation F1
    pub cv_f1: f64,
    /// Unix millis when training finished
    pub trained_at_ms: u64,
}

/// The trained classifier, one of the two supported families
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EstimatorKind {
    RandomForest(RandomForest),
    GradientBoosting(GradientBoostedTrees),
}

impl EstimatorKind {
    /// Positive-class probability, without the metadata dimension check
    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        match self {
            EstimatorKind::RandomForest(forest) => forest.predict_proba(x),
            EstimatorKind::GradientBoosting(booster) => booster.predict_proba(x),
        }
    }

    /// Class label at the 0.5 threshold
    pub fn predict(&self, x: &[f64]) -> u8 {
        u8::from(self.predict_proba(x) >= 0.5)
    }
}

/// Persisted estimator artifact: classifier plus metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimator {
    pub meta: ModelMeta,
    kind: EstimatorKind,
}

impl Estimator {
    /// Wrap a fitted classifier with its metadata.
    pub fn new(meta: ModelMeta, kind: EstimatorKind) -> Self {
        Self { meta, kind }
    }

    /// Positive-class (faulty) probability for one feature vector.
    pub fn predict_proba(&self, x: &[f64]) -> Result<f64, ModelError> {
        if x.len() != self.meta.n_features {
            return Err(ModelError::InvalidDimension {
                expected: self.meta.n_features,
                actual: x.len(),
            });
        }

        Ok(self.kind.predict_proba(x))
    }

    /// Class label: 1 (faulty) when the positive probability reaches 0.5.
    pub fn predict(&self, x: &[f64]) -> Result<u8, ModelError> {
        Ok(u8::from(self.predict_proba(x)? >= 0.5))
    }

    /// Persist the estimator as an opaque artifact.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = postcard::to_allocvec(self)?;
        std::fs::write(path, bytes)?;
        info!("Model saved to {}", path.display());
        Ok(())
    }

    /// Load a persisted estimator, read-only.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::MissingArtifact(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        Ok(postcard::from_bytes(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestParams;

    fn fitted_estimator() -> Estimator {
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, 0.5]).collect();
        let labels: Vec<u8> = (0..20).map(|i| u8::from(i >= 10)).collect();
        let forest = RandomForest::fit(
            &features,
            &labels,
            &ForestParams {
                n_trees: 10,
                ..ForestParams::default()
            },
        )
        .unwrap();

        Estimator::new(
            ModelMeta {
                family: "random_forest".to_string(),
                version: "random_forest-test".to_string(),
                n_features: 2,
                cv_f1: 1.0,
                trained_at_ms: 0,
            },
            EstimatorKind::RandomForest(forest),
        )
    }

    #[test]
    fn test_predict_maps_probability_to_label() {
        let estimator = fitted_estimator();
        assert_eq!(estimator.predict(&[1.0, 0.5]).unwrap(), 0);
        assert_eq!(estimator.predict(&[18.0, 0.5]).unwrap(), 1);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let estimator = fitted_estimator();
        assert!(matches!(
            estimator.predict_proba(&[1.0]),
            Err(ModelError::InvalidDimension { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let estimator = fitted_estimator();
        let path = std::env::temp_dir().join("estimator_artifact_test.bin");

        estimator.save(&path).unwrap();
        let loaded = Estimator::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.meta, estimator.meta);
        let x = vec![7.0, 0.5];
        assert_eq!(
            loaded.predict_proba(&x).unwrap(),
            estimator.predict_proba(&x).unwrap()
        );
    }

    #[test]
    fn test_load_missing_artifact() {
        let result = Estimator::load(Path::new("models/no_such_model.bin"));
        assert!(matches!(result, Err(ModelError::MissingArtifact(_))));
    }
}

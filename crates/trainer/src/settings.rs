//! Training Parameters File

use crate::TrainError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which estimator family the job trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    RandomForest,
    GradientBoosting,
}

impl ModelFamily {
    /// Name used in run logs and model metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "random_forest",
            ModelFamily::GradientBoosting => "gradient_boosting",
        }
    }
}

/// Parameters shared by both families
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedParams {
    /// Seed for splits, bagging, and feature subsampling
    pub random_state: u64,
    /// Cross-validation fold count
    pub cv_folds: usize,
    /// Holdout fraction for the stratified split
    #[serde(default = "default_test_size")]
    pub test_size: f64,
}

fn default_test_size() -> f64 {
    0.2
}

/// Hyperparameter grid for the random forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestGrid {
    pub n_trees: Vec<usize>,
    pub max_depth: Vec<usize>,
    pub min_samples_split: Vec<usize>,
}

/// Hyperparameter grid for gradient boosting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostingGrid {
    pub n_rounds: Vec<usize>,
    pub learning_rate: Vec<f64>,
    pub max_depth: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestSection {
    param_grid: ForestGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoostingSection {
    param_grid: BoostingGrid,
}

/// The full parameters file (`config/training.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub model_type: ModelFamily,
    pub train: SharedParams,
    random_forest: ForestSection,
    gradient_boosting: BoostingSection,
}

impl TrainingConfig {
    /// Load and deserialize the parameters file.
    pub fn load(path: &Path) -> Result<Self, TrainError> {
        if !path.exists() {
            return Err(TrainError::MissingConfig(path.to_path_buf()));
        }
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Grid for the forest family
    pub fn forest_grid(&self) -> &ForestGrid {
        &self.random_forest.param_grid
    }

    /// Grid for the boosting family
    pub fn boosting_grid(&self) -> &BoostingGrid {
        &self.gradient_boosting.param_grid
    }
}

//! End-to-End Training Run

use crate::search::{expand_boosting_grid, expand_forest_grid, gather, grid_search};
use crate::settings::{ModelFamily, TrainingConfig};
use crate::split::{imbalance_ratio, stratified_split};
use crate::tracking::{ExperimentLog, RunRecord};
use crate::TrainError;
use model::metrics::f1_score;
use model::{Estimator, ModelMeta};
use std::path::PathBuf;
use tracing::info;

/// Filesystem layout of one training run
#[derive(Debug, Clone)]
pub struct TrainingPaths {
    /// Processed feature CSV from the featurize job
    pub processed: PathBuf,
    /// Parameters file
    pub params: PathBuf,
    /// Where the champion estimator is persisted
    pub model: PathBuf,
    /// Experiment run log (JSON lines)
    pub run_log: PathBuf,
}

impl Default for TrainingPaths {
    fn default() -> Self {
        Self {
            processed: PathBuf::from("data/processed/features.csv"),
            params: PathBuf::from("config/training.yaml"),
            model: PathBuf::from("models/model.bin"),
            run_log: PathBuf::from("experiments/runs.jsonl"),
        }
    }
}

/// Summary of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub family: String,
    pub version: String,
    pub imbalance_ratio: f64,
    pub best_cv_f1: f64,
    pub holdout_f1: f64,
    pub n_candidates: usize,
}

/// Run the whole training job: split, weight, search, record, persist.
pub fn run_training(paths: &TrainingPaths) -> Result<TrainingReport, TrainError> {
    let config = TrainingConfig::load(&paths.params)?;
    let data = feature_pipeline::load_processed(&paths.processed)?;
    info!(
        "Training {} on {} rows x {} features",
        config.model_type.as_str(),
        data.features.len(),
        data.feature_names.len()
    );

    let (train_idx, test_idx) =
        stratified_split(&data.labels, config.train.test_size, config.train.random_state)?;
    let train_x = gather(&data.features, &train_idx);
    let train_y: Vec<u8> = train_idx.iter().map(|&i| data.labels[i]).collect();

    // Healthy/faulty ratio feeds the class-weighting of both families
    let ratio = imbalance_ratio(&train_y)?;
    info!("Class imbalance ratio (healthy/faulty): {:.2}", ratio);

    let candidates = match config.model_type {
        ModelFamily::RandomForest => {
            expand_forest_grid(config.forest_grid(), config.train.random_state, ratio)
        }
        ModelFamily::GradientBoosting => expand_boosting_grid(config.boosting_grid(), ratio),
    };

    let outcome = grid_search(
        &train_x,
        &train_y,
        candidates,
        config.train.cv_folds,
        config.train.random_state,
    )?;

    // Refit the champion on the full training partition
    let fitted = outcome.best.fit(&train_x, &train_y)?;

    let predicted: Vec<u8> = test_idx.iter().map(|&i| fitted.predict(&data.features[i])).collect();
    let actual: Vec<u8> = test_idx.iter().map(|&i| data.labels[i]).collect();
    let holdout_f1 = f1_score(&actual, &predicted);
    info!(
        "Holdout F1 {:.4} (CV F1 {:.4})",
        holdout_f1, outcome.best_f1
    );

    let trained_at_ms = now_ms();
    let family = outcome.best.family().to_string();
    let version = format!("{}-{}", family, trained_at_ms);

    let estimator = Estimator::new(
        ModelMeta {
            family: family.clone(),
            version: version.clone(),
            n_features: data.feature_names.len(),
            cv_f1: outcome.best_f1,
            trained_at_ms,
        },
        fitted,
    );
    estimator.save(&paths.model)?;

    ExperimentLog::new(&paths.run_log).append(&RunRecord {
        run_name: format!("grid_search_{}", family),
        model_family: family.clone(),
        best_params: outcome.best.params_json(),
        best_cv_f1: outcome.best_f1,
        holdout_f1,
        model_path: paths.model.display().to_string(),
        timestamp_ms: trained_at_ms,
    })?;

    Ok(TrainingReport {
        family,
        version,
        imbalance_ratio: ratio,
        best_cv_f1: outcome.best_f1,
        holdout_f1,
        n_candidates: outcome.n_candidates,
    })
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::CleanRecord;
    use feature_pipeline::ColumnTransform;

    /// Synthetic maintenance table: faulty rows run hot and shaky.
    fn synthetic_records(n: usize) -> Vec<CleanRecord> {
        (0..n)
            .map(|i| {
                let faulty = u8::from(i % 4 == 0);
                let bump = if faulty == 1 { 40.0 } else { 0.0 };
                CleanRecord {
                    temperature: 290.0 + (i % 7) as f64 + bump,
                    pressure: 98.0 + (i % 5) as f64,
                    vibration: 15.0 + (i % 3) as f64 + bump / 2.0,
                    humidity: 40.0 + (i % 11) as f64,
                    equipment: ["Turbine", "Pump", "Compressor"][i % 3].to_string(),
                    location: ["Atlanta", "Chicago"][i % 2].to_string(),
                    faulty,
                }
            })
            .collect()
    }

    #[test]
    fn test_full_training_run_produces_artifact() {
        let dir = std::env::temp_dir().join("trainer_job_test");
        std::fs::create_dir_all(&dir).unwrap();

        let records = synthetic_records(120);
        let transform = ColumnTransform::fit(&records).unwrap();
        let processed = dir.join("features.csv");
        feature_pipeline::write_processed(&processed, &transform, &records).unwrap();

        let params = dir.join("training.yaml");
        std::fs::write(
            &params,
            r#"
model_type: random_forest
train:
  random_state: 42
  cv_folds: 3
random_forest:
  param_grid:
    n_trees: [10]
    max_depth: [5]
    min_samples_split: [2]
gradient_boosting:
  param_grid:
    n_rounds: [10]
    learning_rate: [0.1]
    max_depth: [2]
"#,
        )
        .unwrap();

        let paths = TrainingPaths {
            processed,
            params,
            model: dir.join("model.bin"),
            run_log: dir.join("runs.jsonl"),
        };
        let report = run_training(&paths).unwrap();

        assert_eq!(report.family, "random_forest");
        assert_eq!(report.n_candidates, 1);
        assert!((report.imbalance_ratio - 3.0).abs() < 0.2);
        // Hot-and-shaky faults are nearly separable
        assert!(report.best_cv_f1 > 0.8);

        let estimator = Estimator::load(&paths.model).unwrap();
        assert_eq!(estimator.meta.family, "random_forest");
        assert_eq!(estimator.meta.n_features, transform.dimension());

        let runs = ExperimentLog::new(&paths.run_log).runs().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].model_family, "random_forest");

        std::fs::remove_dir_all(&dir).ok();
    }
}

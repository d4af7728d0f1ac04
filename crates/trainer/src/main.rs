//! Training Batch Job
//!
//! Grid-searches the configured model family over the processed dataset
//! and persists the champion estimator for the inference service.

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use trainer::{run_training, TrainingPaths};

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let report = run_training(&TrainingPaths::default())?;

    info!(
        "{} training complete. Best CV F1: {:.4}, holdout F1: {:.4} ({} candidates)",
        report.family, report.best_cv_f1, report.holdout_f1, report.n_candidates
    );
    Ok(())
}

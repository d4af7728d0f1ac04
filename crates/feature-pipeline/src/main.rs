//! Feature Generation Batch Job
//!
//! Fits the column transform on the cleaned interim dataset, writes the
//! processed feature table, and persists the transform for serving.

use feature_pipeline::ColumnTransform;
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let input_path = Path::new("data/interim/cleaned.csv");
    let output_path = Path::new("data/processed/features.csv");
    let transform_path = Path::new("models/preprocessor.bin");

    info!("Starting feature generation");

    let records = dataset::load_cleaned(input_path)?;
    let transform = ColumnTransform::fit(&records)?;
    feature_pipeline::write_processed(output_path, &transform, &records)?;
    transform.save(transform_path)?;

    info!(
        "Feature generation complete: {} rows, {} features",
        records.len(),
        transform.dimension()
    );
    Ok(())
}

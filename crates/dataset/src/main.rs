//! Ingestion Batch Job
//!
//! Loads the raw equipment anomaly CSV, cleans it, and writes the interim
//! dataset consumed by feature generation.

use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let input_path = Path::new("data/raw/equipment_sensors.csv");
    let output_path = Path::new("data/interim/cleaned.csv");

    info!("Starting data ingestion");

    let raw = dataset::load_raw(input_path)?;
    let cleaned = dataset::clean(&raw)?;
    dataset::write_cleaned(output_path, &cleaned)?;

    info!("Ingestion complete: {} rows", cleaned.len());
    Ok(())
}

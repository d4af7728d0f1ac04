//! Raw Data Loading and Cleaning

use crate::error::DatasetError;
use crate::records::{CleanRecord, RawRecord};
use std::path::Path;
use tracing::{debug, info};

/// Load the raw equipment anomaly CSV from the data folder.
///
/// Fails with [`DatasetError::MissingInput`] if the file is absent.
pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RawRecord = row?;
        records.push(record);
    }

    info!("Loaded {} raw records from {}", records.len(), path.display());
    Ok(records)
}

/// Refine raw records for feature generation:
/// 1. Coerce the 'faulty' target to a discrete 0 or 1.
/// 2. Strip whitespace from category names, so ' Turbine' and 'Turbine'
///    are the same level.
///
/// Idempotent: cleaning already-clean data yields the same rows.
pub fn clean(records: &[RawRecord]) -> Result<Vec<CleanRecord>, DatasetError> {
    debug!("Cleaning {} records", records.len());

    records
        .iter()
        .enumerate()
        .map(|(row, r)| {
            let value = r.faulty.ok_or(DatasetError::MissingLabel { row })?;
            let faulty = coerce_label(row, value)?;

            Ok(CleanRecord {
                temperature: r.temperature,
                pressure: r.pressure,
                vibration: r.vibration,
                humidity: r.humidity,
                equipment: r.equipment.trim().to_string(),
                location: r.location.trim().to_string(),
                faulty,
            })
        })
        .collect()
}

/// Write cleaned records to the interim CSV, creating parent directories.
pub fn write_cleaned(path: &Path, records: &[CleanRecord]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Cleaned data saved to {}", path.display());
    Ok(())
}

/// Load a previously cleaned interim CSV.
pub fn load_cleaned(path: &Path) -> Result<Vec<CleanRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: CleanRecord = row?;
        records.push(record);
    }
    Ok(records)
}

fn coerce_label(row: usize, value: f64) -> Result<u8, DatasetError> {
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(DatasetError::InvalidLabel { row, value })
    }
}

//! Processed Dataset I/O
//!
//! The featurize job writes the transformed table (feature columns plus
//! the untouched label) as CSV; the trainer reads it back.

use crate::error::PipelineError;
use crate::transform::ColumnTransform;
use dataset::CleanRecord;
use std::path::Path;
use tracing::info;

/// In-memory processed dataset: row-major features plus labels
#[derive(Debug, Clone)]
pub struct ProcessedData {
    /// Feature column names, in vector order
    pub feature_names: Vec<String>,
    /// One feature vector per row
    pub features: Vec<Vec<f64>>,
    /// Binary labels, aligned with `features`
    pub labels: Vec<u8>,
}

/// Transform cleaned rows and write the processed CSV, label reattached
/// unchanged as the final column.
pub fn write_processed(
    path: &Path,
    transform: &ColumnTransform,
    records: &[CleanRecord],
) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;

    let mut header = transform.feature_names();
    header.push("faulty".to_string());
    writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = transform
            .transform(&record.reading())
            .iter()
            .map(|v| v.to_string())
            .collect();
        row.push(record.faulty.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!("Processed features saved to {}", path.display());
    Ok(())
}

/// Load a processed CSV back into memory.
pub fn load_processed(path: &Path) -> Result<ProcessedData, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?.clone();

    let label_index = header
        .iter()
        .position(|name| name == "faulty")
        .ok_or_else(|| PipelineError::MissingColumn("faulty".to_string()))?;

    let feature_names: Vec<String> = header
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_index)
        .map(|(_, name)| name.to_string())
        .collect();

    let mut features = Vec::new();
    let mut labels = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let mut vector = Vec::with_capacity(feature_names.len());
        for (i, field) in record.iter().enumerate() {
            let column = header.get(i).unwrap_or("?");
            // Corrupt data fails the job; training must never see
            // fabricated values
            let value: f64 = field.parse().map_err(|_| PipelineError::Parse {
                row,
                column: column.to_string(),
                value: field.to_string(),
            })?;

            if i == label_index {
                if value != 0.0 && value != 1.0 {
                    return Err(PipelineError::Parse {
                        row,
                        column: column.to_string(),
                        value: field.to_string(),
                    });
                }
                labels.push(value as u8);
            } else {
                vector.push(value);
            }
        }
        features.push(vector);
    }

    Ok(ProcessedData {
        feature_names,
        features,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(t: f64, equipment: &str, faulty: u8) -> CleanRecord {
        CleanRecord {
            temperature: t,
            pressure: 100.0,
            vibration: 20.0,
            humidity: 45.0,
            equipment: equipment.to_string(),
            location: "Atlanta".to_string(),
            faulty,
        }
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let records = vec![
            record(290.0, "Turbine", 0),
            record(310.0, "Pump", 1),
            record(305.0, "Turbine", 1),
        ];
        let transform = ColumnTransform::fit(&records).unwrap();
        let path = std::env::temp_dir().join("processed_features_test.csv");

        write_processed(&path, &transform, &records).unwrap();
        let loaded = load_processed(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.features.len(), 3);
        assert_eq!(loaded.labels, vec![0, 1, 1]);
        assert_eq!(loaded.feature_names, transform.feature_names());
        assert_eq!(loaded.features[0].len(), transform.dimension());
    }

    #[test]
    fn test_corrupt_field_fails_the_load() {
        let path = std::env::temp_dir().join("processed_corrupt_field_test.csv");
        std::fs::write(&path, "temperature,faulty\nnot_a_number,oops\n").unwrap();

        let result = load_processed(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(PipelineError::Parse { row: 0, .. })
        ));
    }

    #[test]
    fn test_non_binary_label_fails_the_load() {
        let path = std::env::temp_dir().join("processed_bad_label_test.csv");
        std::fs::write(&path, "temperature,faulty\n1.5,2\n").unwrap();

        let result = load_processed(&path);
        std::fs::remove_file(&path).ok();

        match result {
            Err(PipelineError::Parse { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "faulty");
                assert_eq!(value, "2");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_input() {
        let result = load_processed(Path::new("data/processed/no_such_file.csv"));
        assert!(matches!(result, Err(PipelineError::MissingInput(_))));
    }
}

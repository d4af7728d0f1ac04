//! Ingestion Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors during dataset ingestion and cleaning
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Input file does not exist
    #[error("Input file not found: {0}")]
    MissingInput(PathBuf),

    /// CSV parse or write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Label column absent from a training row
    #[error("Row {row} is missing the 'faulty' label")]
    MissingLabel { row: usize },

    /// Label value is not a binary 0/1
    #[error("Row {row} has label {value}, expected 0 or 1")]
    InvalidLabel { row: usize, value: f64 },
}

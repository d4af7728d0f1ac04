//! Pipeline Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors during feature generation and transform persistence
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Persisted transform not found at the expected path
    #[error("Transform artifact not found: {0}")]
    MissingArtifact(PathBuf),

    /// Input dataset not found
    #[error("Input file not found: {0}")]
    MissingInput(PathBuf),

    /// Transform fitted on an empty dataset
    #[error("Cannot fit transform on an empty dataset")]
    EmptyDataset,

    /// Artifact encode/decode failure
    #[error("Artifact codec error: {0}")]
    Codec(#[from] postcard::Error),

    /// CSV parse or write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Processed CSV missing an expected column
    #[error("Processed dataset is missing column '{0}'")]
    MissingColumn(String),

    /// Processed CSV field is not a usable numeric value
    #[error("Row {row}, column '{column}': invalid value '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },
}

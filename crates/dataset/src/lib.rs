//! Dataset Ingestion and Cleaning
//!
//! Loads raw equipment sensor CSVs and refines them for feature generation.

mod clean;
mod error;
mod records;

pub use clean::{clean, load_cleaned, load_raw, write_cleaned};
pub use error::DatasetError;
pub use records::{CleanRecord, RawRecord, SensorReading};

//! Feature Pipeline
//!
//! Turns cleaned sensor rows into fixed-order feature vectors: numeric
//! columns are standardized, categorical columns one-hot encoded. The
//! fitted transform is persisted once and replayed unchanged at inference.

mod encoder;
mod error;
mod processed;
mod scaler;
mod transform;

pub use encoder::OneHotEncoder;
pub use error::PipelineError;
pub use processed::{load_processed, write_processed, ProcessedData};
pub use scaler::StandardScaler;
pub use transform::ColumnTransform;

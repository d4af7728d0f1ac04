//! Service Settings

use crate::error::ApiError;
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime settings for the inference service.
///
/// Defaults match the batch jobs' output paths; any field can be
/// overridden through `MAINTENANCE_*` environment variables
/// (e.g. `MAINTENANCE_BIND_ADDR=127.0.0.1:9000`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    /// Socket address the server binds to
    pub bind_addr: String,
    /// Persisted column transform
    pub preprocessor_path: PathBuf,
    /// Persisted estimator
    pub model_path: PathBuf,
}

impl ServiceSettings {
    /// Load settings from defaults plus environment overrides.
    pub fn load() -> Result<Self, ApiError> {
        let settings = config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:8000")?
            .set_default("preprocessor_path", "models/preprocessor.bin")?
            .set_default("model_path", "models/model.bin")?
            .add_source(config::Environment::with_prefix("MAINTENANCE"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ServiceSettings::load().unwrap();
        assert_eq!(settings.bind_addr, "0.0.0.0:8000");
        assert_eq!(settings.preprocessor_path, PathBuf::from("models/preprocessor.bin"));
        assert_eq!(settings.model_path, PathBuf::from("models/model.bin"));
    }
}

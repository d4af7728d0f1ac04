//! Sensor Record Types

use serde::{Deserialize, Serialize};

/// Raw CSV row as it arrives from the data folder.
///
/// String columns may carry stray whitespace and the label may be encoded
/// as a float; [`crate::clean`] resolves both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub temperature: f64,
    pub pressure: f64,
    pub vibration: f64,
    pub humidity: f64,
    pub equipment: String,
    pub location: String,
    /// Binary fault label, present in training exports only
    #[serde(default)]
    pub faulty: Option<f64>,
}

/// Cleaned training row: trimmed categories, integer 0/1 label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub temperature: f64,
    pub pressure: f64,
    pub vibration: f64,
    pub humidity: f64,
    pub equipment: String,
    pub location: String,
    pub faulty: u8,
}

impl CleanRecord {
    /// The feature fields of this row, without the label
    pub fn reading(&self) -> SensorReading {
        SensorReading {
            temperature: self.temperature,
            pressure: self.pressure,
            vibration: self.vibration,
            humidity: self.humidity,
            equipment: self.equipment.clone(),
            location: self.location.clone(),
        }
    }
}

/// One unlabeled observation, as posted to the inference service.
///
/// All six fields are required; serde rejects payloads missing any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: f64,
    pub pressure: f64,
    pub vibration: f64,
    pub humidity: f64,
    pub equipment: String,
    pub location: String,
}

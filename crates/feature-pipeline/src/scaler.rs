//! Numeric Column Standardization

use serde::{Deserialize, Serialize};

/// Per-column z-score scaler: zero mean, unit variance.
///
/// Statistics come from the fit data only; `transform` never updates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column mean
    means: Vec<f64>,
    /// Per-column scale (population std dev, 1.0 for constant columns)
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit the scaler on column-major data.
    pub fn fit(columns: &[Vec<f64>]) -> Self {
        let mut means = Vec::with_capacity(columns.len());
        let mut scales = Vec::with_capacity(columns.len());

        for column in columns {
            let n = column.len() as f64;
            let mean = if column.is_empty() {
                0.0
            } else {
                column.iter().sum::<f64>() / n
            };

            let variance = if column.is_empty() {
                0.0
            } else {
                column.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
            };
            let std_dev = variance.sqrt();

            means.push(mean);
            // A constant column carries no signal; leave it centered only
            scales.push(if std_dev > 0.0 { std_dev } else { 1.0 });
        }

        Self { means, scales }
    }

    /// Scale one row of numeric values, in fitted column order.
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (mean, scale))| (v - mean) / scale)
            .collect()
    }

    /// Number of fitted columns
    pub fn n_columns(&self) -> usize {
        self.means.len()
    }

    /// Fitted mean for a column
    pub fn mean(&self, column: usize) -> f64 {
        self.means[column]
    }

    /// Fitted scale for a column
    pub fn scale(&self, column: usize) -> f64 {
        self.scales[column]
    }
}

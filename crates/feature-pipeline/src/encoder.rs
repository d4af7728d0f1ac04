//! Categorical One-Hot Encoding

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder over string-valued columns.
///
/// Each column gets one indicator per level observed at fit time, in
/// sorted order. A level unseen at fit time encodes as an all-zero block
/// rather than erroring, so new equipment names degrade instead of
/// failing requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Sorted vocabulary per column
    vocabularies: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Fit the encoder on column-major string data.
    pub fn fit(columns: &[Vec<&str>]) -> Self {
        let vocabularies = columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .collect();

        Self { vocabularies }
    }

    /// Append the indicator block for one column value onto `out`.
    ///
    /// Returns `false` when the level was not in the fitted vocabulary
    /// (the block is all zeros in that case).
    pub fn encode_into(&self, column: usize, value: &str, out: &mut Vec<f64>) -> bool {
        let vocabulary = &self.vocabularies[column];
        let hit = vocabulary.iter().position(|level| level == value);

        for i in 0..vocabulary.len() {
            out.push(if hit == Some(i) { 1.0 } else { 0.0 });
        }
        hit.is_some()
    }

    /// Total indicator width across all columns
    pub fn dimension(&self) -> usize {
        self.vocabularies.iter().map(Vec::len).sum()
    }

    /// Fitted levels for a column
    pub fn levels(&self, column: usize) -> &[String] {
        &self.vocabularies[column]
    }

    /// Number of encoded columns
    pub fn n_columns(&self) -> usize {
        self.vocabularies.len()
    }
}

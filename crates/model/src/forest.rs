//! Bagged Random Forest

use crate::tree::{DecisionTree, TreeParams};
use crate::ModelError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of bagged trees
    pub n_trees: usize,
    /// Per-tree depth limit
    pub max_depth: usize,
    /// Minimum samples to attempt a split
    pub min_samples_split: usize,
    /// Base seed; tree `i` derives its own stream from `seed + i`
    pub seed: u64,
    /// Per-class sample weights `[healthy, faulty]`; inverse-frequency
    /// weighting boosts the rare faulty class
    pub class_weights: [f64; 2],
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 8,
            min_samples_split: 2,
            seed: 42,
            class_weights: [1.0, 1.0],
        }
    }
}

/// An ensemble of bootstrap-trained decision trees.
///
/// `predict_proba` averages leaf probabilities across trees, matching a
/// soft-voting classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit the forest on row-major features and binary labels.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[u8],
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        if features.is_empty() {
            return Err(ModelError::DegenerateData("no training rows".to_string()));
        }
        let n = features.len();
        let n_features = features[0].len();

        let weights: Vec<f64> = labels
            .iter()
            .map(|&y| params.class_weights[y as usize])
            .collect();

        // sqrt(d) features per split, the usual forest default
        let max_features = (n_features as f64).sqrt().ceil() as usize;
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: 1,
            max_features: Some(max_features.max(1)),
        };

        let mut trees = Vec::with_capacity(params.n_trees);
        for i in 0..params.n_trees {
            let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(i as u64));
            let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let tree =
                DecisionTree::fit_indices(features, labels, &weights, &indices, tree_params, &mut rng)?;
            trees.push(tree);
        }

        debug!("Fitted random forest with {} trees", trees.len());
        Ok(Self { trees, n_features })
    }

    /// Mean positive-class probability across trees
    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(x)).sum();
        sum / self.trees.len() as f64
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature dimension the forest was fitted on
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

//! Gradient-Boosted Trees
//!
//! Binary classifier with logistic loss. Each round fits a depth-limited
//! regression tree to the gradient/hessian statistics and adds its
//! Newton-step leaf values to the running log-odds score.

use crate::ModelError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// L2 regularization on leaf values
const LAMBDA: f64 = 1.0;

/// Boosting hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoostingParams {
    /// Number of boosting rounds
    pub n_rounds: usize,
    /// Shrinkage applied to each tree's contribution
    pub learning_rate: f64,
    /// Per-tree depth limit
    pub max_depth: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
    /// Weight multiplier for positive instances, the class-imbalance
    /// signal (negatives / positives)
    pub scale_pos_weight: f64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
            scale_pos_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum RegNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One regression tree over gradient statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegressionTree {
    nodes: Vec<RegNode>,
}

impl RegressionTree {
    fn predict(&self, x: &[f64]) -> f64 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                RegNode::Leaf { value } => return *value,
                RegNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// A fitted gradient-boosted-tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    /// Initial log-odds score
    base_score: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoostedTrees {
    /// Fit the booster on row-major features and binary labels.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[u8],
        params: &BoostingParams,
    ) -> Result<Self, ModelError> {
        if features.is_empty() {
            return Err(ModelError::DegenerateData("no training rows".to_string()));
        }
        let n = features.len();
        let n_features = features[0].len();

        let weights: Vec<f64> = labels
            .iter()
            .map(|&y| if y == 1 { params.scale_pos_weight } else { 1.0 })
            .collect();

        // Weighted prior as the starting log-odds
        let pos_w: f64 = weights
            .iter()
            .zip(labels)
            .filter(|(_, &y)| y == 1)
            .map(|(w, _)| w)
            .sum();
        let total_w: f64 = weights.iter().sum();
        let p0 = (pos_w / total_w).clamp(1e-6, 1.0 - 1e-6);
        let base_score = (p0 / (1.0 - p0)).ln();

        let mut scores = vec![base_score; n];
        let mut trees = Vec::with_capacity(params.n_rounds);

        for round in 0..params.n_rounds {
            let mut gradients = Vec::with_capacity(n);
            let mut hessians = Vec::with_capacity(n);
            for i in 0..n {
                let p = sigmoid(scores[i]);
                gradients.push(weights[i] * (f64::from(labels[i]) - p));
                hessians.push(weights[i] * p * (1.0 - p));
            }

            let indices: Vec<usize> = (0..n).collect();
            let mut builder = RegTreeBuilder {
                features,
                gradients: &gradients,
                hessians: &hessians,
                params,
                nodes: Vec::new(),
            };
            builder.grow(indices, 0);
            let tree = RegressionTree { nodes: builder.nodes };

            for i in 0..n {
                scores[i] += params.learning_rate * tree.predict(&features[i]);
            }
            trees.push(tree);

            if round % 25 == 0 {
                debug!("Boosting round {}: {} trees", round, trees.len());
            }
        }

        Ok(Self {
            base_score,
            learning_rate: params.learning_rate,
            trees,
            n_features,
        })
    }

    /// Positive-class probability for one feature vector
    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        let score: f64 = self.base_score
            + self.learning_rate * self.trees.iter().map(|t| t.predict(x)).sum::<f64>();
        sigmoid(score)
    }

    /// Number of boosting rounds fitted
    pub fn n_rounds(&self) -> usize {
        self.trees.len()
    }

    /// Feature dimension the booster was fitted on
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

struct RegTreeBuilder<'a> {
    features: &'a [Vec<f64>],
    gradients: &'a [f64],
    hessians: &'a [f64],
    params: &'a BoostingParams,
    nodes: Vec<RegNode>,
}

impl RegTreeBuilder<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let g: f64 = indices.iter().map(|&i| self.gradients[i]).sum();
        let h: f64 = indices.iter().map(|&i| self.hessians[i]).sum();
        let leaf_value = g / (h + LAMBDA);

        if depth >= self.params.max_depth || indices.len() < 2 * self.params.min_samples_leaf {
            return self.push(RegNode::Leaf { value: leaf_value });
        }

        let Some((feature, threshold)) = self.best_split(&indices, g, h) else {
            return self.push(RegNode::Leaf { value: leaf_value });
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.features[i][feature] <= threshold);

        let node = self.push(RegNode::Leaf { value: leaf_value });
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[node] = RegNode::Split {
            feature,
            threshold,
            left,
            right,
        };
        node
    }

    fn push(&mut self, node: RegNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Maximize the standard second-order gain:
    /// `GL²/(HL+λ) + GR²/(HR+λ) - G²/(H+λ)`
    fn best_split(&self, indices: &[usize], g: f64, h: f64) -> Option<(usize, f64)> {
        let n_features = self.features[indices[0]].len();
        let parent_score = g * g / (h + LAMBDA);
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in 0..n_features {
            let mut sorted: Vec<usize> = indices.to_vec();
            sorted.sort_by(|&a, &b| {
                self.features[a][feature]
                    .partial_cmp(&self.features[b][feature])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut gl = 0.0;
            let mut hl = 0.0;
            for (rank, &i) in sorted.iter().enumerate() {
                gl += self.gradients[i];
                hl += self.hessians[i];

                let next = rank + 1;
                if next >= sorted.len() {
                    break;
                }
                if next < self.params.min_samples_leaf
                    || sorted.len() - next < self.params.min_samples_leaf
                {
                    continue;
                }

                let here = self.features[i][feature];
                let after = self.features[sorted[next]][feature];
                if here == after {
                    continue;
                }

                let gr = g - gl;
                let hr = h - hl;
                let gain =
                    gl * gl / (hl + LAMBDA) + gr * gr / (hr + LAMBDA) - parent_score;

                if gain > 1e-12 && best.map_or(true, |(_, _, b)| gain > b) {
                    best = Some((feature, (here + after) / 2.0, gain));
                }
            }
        }

        best.map(|(feature, threshold, _)| (feature, threshold))
    }
}

//! CART Decision Tree
//!
//! Binary classification tree with weighted Gini splitting. Sample
//! weights carry the class-imbalance signal, so the rare faulty class is
//! not out-voted by healthy rows.

use crate::ModelError;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

/// Tree growth limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth of the tree
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 8,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

/// Flat-arena tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    /// Terminal node holding the weighted positive-class fraction
    Leaf { probability: f64 },
    /// Internal split: `x[feature] <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted classification tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    /// Fit on the full dataset with per-sample weights.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[u8],
        weights: &[f64],
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Result<Self, ModelError> {
        let indices: Vec<usize> = (0..features.len()).collect();
        Self::fit_indices(features, labels, weights, &indices, params, rng)
    }

    /// Fit on a subset of rows (bootstrap indices may repeat).
    pub(crate) fn fit_indices(
        features: &[Vec<f64>],
        labels: &[u8],
        weights: &[f64],
        indices: &[usize],
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Result<Self, ModelError> {
        if indices.is_empty() {
            return Err(ModelError::DegenerateData("no training rows".to_string()));
        }
        let n_features = features[indices[0]].len();

        let mut builder = TreeBuilder {
            features,
            labels,
            weights,
            params,
            n_features,
            nodes: Vec::new(),
        };
        builder.grow(indices.to_vec(), 0, rng);

        Ok(Self {
            nodes: builder.nodes,
            n_features,
        })
    }

    /// Positive-class probability for one feature vector
    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { probability } => return *probability,
                Node::Split {
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

    /// Number of nodes in the tree
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Feature dimension the tree was fitted on
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

struct TreeBuilder<'a> {
    features: &'a [Vec<f64>],
    labels: &'a [u8],
    weights: &'a [f64],
    params: TreeParams,
    n_features: usize,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow a subtree over `indices`, returning its node id.
    fn grow(&mut self, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let (pos_w, total_w) = self.weighted_counts(&indices);
        let probability = if total_w > 0.0 { pos_w / total_w } else { 0.0 };

        let pure = probability == 0.0 || probability == 1.0;
        if pure || depth >= self.params.max_depth || indices.len() < self.params.min_samples_split {
            return self.push(Node::Leaf { probability });
        }

        let Some((feature, threshold)) = self.best_split(&indices, rng) else {
            return self.push(Node::Leaf { probability });
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.features[i][feature] <= threshold);

        // Reserve the split slot before growing children
        let node = self.push(Node::Leaf { probability });
        let left = self.grow(left_idx, depth + 1, rng);
        let right = self.grow(right_idx, depth + 1, rng);
        self.nodes[node] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        node
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn weighted_counts(&self, indices: &[usize]) -> (f64, f64) {
        let mut pos_w = 0.0;
        let mut total_w = 0.0;
        for &i in indices {
            total_w += self.weights[i];
            if self.labels[i] == 1 {
                pos_w += self.weights[i];
            }
        }
        (pos_w, total_w)
    }

    /// Exhaustive scan for the split minimizing weighted Gini impurity.
    fn best_split(&self, indices: &[usize], rng: &mut StdRng) -> Option<(usize, f64)> {
        let candidates: Vec<usize> = match self.params.max_features {
            Some(k) if k < self.n_features => {
                sample(rng, self.n_features, k).into_iter().collect()
            }
            _ => (0..self.n_features).collect(),
        };

        let (total_pos, total_w) = self.weighted_counts(indices);
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in candidates {
            let mut sorted: Vec<usize> = indices.to_vec();
            sorted.sort_by(|&a, &b| {
                self.features[a][feature]
                    .partial_cmp(&self.features[b][feature])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut left_pos = 0.0;
            let mut left_w = 0.0;
            for (rank, &i) in sorted.iter().enumerate() {
                left_w += self.weights[i];
                if self.labels[i] == 1 {
                    left_pos += self.weights[i];
                }

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

                let right_w = total_w - left_w;
                let right_pos = total_pos - left_pos;
                let impurity =
                    left_w * gini(left_pos, left_w) + right_w * gini(right_pos, right_w);

                if best.map_or(true, |(_, _, b)| impurity < b) {
                    best = Some((feature, (here + after) / 2.0, impurity));
                }
            }
        }

        // Only split if it actually reduces impurity
        let parent_impurity = total_w * gini(total_pos, total_w);
        best.filter(|&(_, _, impurity)| impurity < parent_impurity - 1e-12)
            .map(|(feature, threshold, _)| (feature, threshold))
    }
}

/// Weighted two-class Gini impurity
fn gini(pos_w: f64, total_w: f64) -> f64 {
    if total_w <= 0.0 {
        return 0.0;
    }
    let p = pos_w / total_w;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn uniform_weights(n: usize) -> Vec<f64> {
        vec![1.0; n]
    }

    #[test]
    fn test_fits_separable_data() {
        // Faulty iff temperature above 5
        let features: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, 0.0]).collect();
        let labels: Vec<u8> = (0..10).map(|i| u8::from(i > 5)).collect();
        let mut rng = StdRng::seed_from_u64(42);

        let tree = DecisionTree::fit(
            &features,
            &labels,
            &uniform_weights(10),
            TreeParams::default(),
            &mut rng,
        )
        .unwrap();

        assert!(tree.n_nodes() > 1);
        assert!(tree.predict_proba(&[2.0, 0.0]) < 0.5);
        assert!(tree.predict_proba(&[9.0, 0.0]) > 0.5);
    }

    #[test]
    fn test_pure_node_becomes_leaf() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0]];
        let labels = vec![1, 1, 1];
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(
            &features,
            &labels,
            &uniform_weights(3),
            TreeParams::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_proba(&[2.0]), 1.0);
    }

    #[test]
    fn test_depth_limit_respected() {
        let features: Vec<Vec<f64>> = (0..32).map(|i| vec![i as f64]).collect();
        let labels: Vec<u8> = (0..32).map(|i| (i % 2) as u8).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let params = TreeParams {
            max_depth: 1,
            ..TreeParams::default()
        };
        let tree =
            DecisionTree::fit(&features, &labels, &uniform_weights(32), params, &mut rng).unwrap();

        // Depth-1 tree holds at most one split and two leaves
        assert!(tree.n_nodes() <= 3);
    }

    #[test]
    fn test_class_weights_shift_leaf_probability() {
        // One positive among four rows, identical features: no split
        // possible, leaf probability is the weighted fraction
        let features = vec![vec![1.0]; 4];
        let labels = vec![0, 0, 0, 1];
        let mut rng = StdRng::seed_from_u64(3);

        let unweighted = DecisionTree::fit(
            &features,
            &labels,
            &uniform_weights(4),
            TreeParams::default(),
            &mut rng,
        )
        .unwrap();
        let weighted = DecisionTree::fit(
            &features,
            &labels,
            &[1.0, 1.0, 1.0, 3.0],
            TreeParams::default(),
            &mut rng,
        )
        .unwrap();

        assert!((unweighted.predict_proba(&[1.0]) - 0.25).abs() < 1e-9);
        assert!((weighted.predict_proba(&[1.0]) - 0.5).abs() < 1e-9);
    }
}

//! Cross-Validated Grid Search

use crate::settings::{BoostingGrid, ForestGrid};
use crate::split::stratified_kfold;
use crate::TrainError;
use model::metrics::f1_score;
use model::{BoostingParams, EstimatorKind, ForestParams, GradientBoostedTrees, RandomForest};
use serde_json::json;
use tracing::{debug, info};

/// One hyperparameter configuration under evaluation
#[derive(Debug, Clone)]
pub enum Candidate {
    Forest(ForestParams),
    Boosting(BoostingParams),
}

impl Candidate {
    /// Family name for logs and metadata
    pub fn family(&self) -> &'static str {
        match self {
            Candidate::Forest(_) => "random_forest",
            Candidate::Boosting(_) => "gradient_boosting",
        }
    }

    /// Hyperparameters as a JSON object for the run log
    pub fn params_json(&self) -> serde_json::Value {
        match self {
            Candidate::Forest(p) => json!({
                "n_trees": p.n_trees,
                "max_depth": p.max_depth,
                "min_samples_split": p.min_samples_split,
            }),
            Candidate::Boosting(p) => json!({
                "n_rounds": p.n_rounds,
                "learning_rate": p.learning_rate,
                "max_depth": p.max_depth,
            }),
        }
    }

    /// Fit this configuration on the given rows.
    pub fn fit(&self, features: &[Vec<f64>], labels: &[u8]) -> Result<EstimatorKind, TrainError> {
        Ok(match self {
            Candidate::Forest(params) => {
                EstimatorKind::RandomForest(RandomForest::fit(features, labels, params)?)
            }
            Candidate::Boosting(params) => {
                EstimatorKind::GradientBoosting(GradientBoostedTrees::fit(features, labels, params)?)
            }
        })
    }
}

/// Winner of a grid search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best-scoring configuration
    pub best: Candidate,
    /// Its mean cross-validation F1
    pub best_f1: f64,
    /// How many configurations were evaluated
    pub n_candidates: usize,
}

/// Cartesian expansion of the forest grid. The imbalance ratio arrives as
/// the positive-class weight (inverse-frequency weighting).
pub fn expand_forest_grid(grid: &ForestGrid, seed: u64, positive_weight: f64) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for &n_trees in &grid.n_trees {
        for &max_depth in &grid.max_depth {
            for &min_samples_split in &grid.min_samples_split {
                candidates.push(Candidate::Forest(ForestParams {
                    n_trees,
                    max_depth,
                    min_samples_split,
                    seed,
                    class_weights: [1.0, positive_weight],
                }));
            }
        }
    }
    candidates
}

/// Cartesian expansion of the boosting grid, carrying the imbalance
/// ratio as scale-pos-weight.
pub fn expand_boosting_grid(grid: &BoostingGrid, scale_pos_weight: f64) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for &n_rounds in &grid.n_rounds {
        for &learning_rate in &grid.learning_rate {
            for &max_depth in &grid.max_depth {
                candidates.push(Candidate::Boosting(BoostingParams {
                    n_rounds,
                    learning_rate,
                    max_depth,
                    min_samples_leaf: 1,
                    scale_pos_weight,
                }));
            }
        }
    }
    candidates
}

/// Exhaustive search: score every candidate by mean k-fold F1, keep the
/// highest.
pub fn grid_search(
    features: &[Vec<f64>],
    labels: &[u8],
    candidates: Vec<Candidate>,
    cv_folds: usize,
    seed: u64,
) -> Result<SearchOutcome, TrainError> {
    if candidates.is_empty() {
        return Err(TrainError::EmptyGrid("no candidates configured".to_string()));
    }

    let folds = stratified_kfold(labels, cv_folds, seed);
    let n_candidates = candidates.len();
    info!(
        "Grid search: {} candidates x {} folds",
        n_candidates, cv_folds
    );

    let mut best: Option<(Candidate, f64)> = None;
    for candidate in candidates {
        let score = cross_validate(features, labels, &candidate, &folds)?;
        debug!(
            "Candidate {} {} -> CV F1 {:.4}",
            candidate.family(),
            candidate.params_json(),
            score
        );

        if best.as_ref().map_or(true, |(_, b)| score > *b) {
            best = Some((candidate, score));
        }
    }

    // candidates was non-empty, so best is set
    let (best, best_f1) = best.ok_or_else(|| TrainError::EmptyGrid("search".to_string()))?;
    info!(
        "Champion: {} {} with CV F1 {:.4}",
        best.family(),
        best.params_json(),
        best_f1
    );

    Ok(SearchOutcome {
        best,
        best_f1,
        n_candidates,
    })
}

fn cross_validate(
    features: &[Vec<f64>],
    labels: &[u8],
    candidate: &Candidate,
    folds: &[Vec<usize>],
) -> Result<f64, TrainError> {
    let mut scores = Vec::with_capacity(folds.len());

    for (k, validation) in folds.iter().enumerate() {
        let train: Vec<usize> = folds
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != k)
            .flat_map(|(_, fold)| fold.iter().copied())
            .collect();

        let train_x = gather(features, &train);
        let train_y: Vec<u8> = train.iter().map(|&i| labels[i]).collect();
        let fitted = candidate.fit(&train_x, &train_y)?;

        let predicted: Vec<u8> = validation
            .iter()
            .map(|&i| fitted.predict(&features[i]))
            .collect();
        let actual: Vec<u8> = validation.iter().map(|&i| labels[i]).collect();
        scores.push(f1_score(&actual, &predicted));
    }

    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Clone the rows at `indices` into a contiguous training matrix.
pub fn gather(features: &[Vec<f64>], indices: &[usize]) -> Vec<Vec<f64>> {
    indices.iter().map(|&i| features[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_data() -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let offset = if i % 4 == 0 { 10.0 } else { 0.0 };
            features.push(vec![i as f64 % 4.0 + offset, offset]);
            labels.push(u8::from(offset > 0.0));
        }
        (features, labels)
    }

    #[test]
    fn test_forest_grid_expansion_size() {
        let grid = ForestGrid {
            n_trees: vec![10, 20],
            max_depth: vec![3, 5, 7],
            min_samples_split: vec![2],
        };
        let candidates = expand_forest_grid(&grid, 42, 1.0);
        assert_eq!(candidates.len(), 6);
    }

    #[test]
    fn test_boosting_grid_expansion_size() {
        let grid = BoostingGrid {
            n_rounds: vec![10],
            learning_rate: vec![0.05, 0.1],
            max_depth: vec![2, 3],
        };
        let candidates = expand_boosting_grid(&grid, 4.0);
        assert_eq!(candidates.len(), 4);
        for c in &candidates {
            match c {
                Candidate::Boosting(p) => assert!((p.scale_pos_weight - 4.0).abs() < 1e-9),
                Candidate::Forest(_) => panic!("expected boosting candidates"),
            }
        }
    }

    #[test]
    fn test_grid_search_finds_working_candidate() {
        let (features, labels) = separable_data();
        let grid = ForestGrid {
            n_trees: vec![10],
            max_depth: vec![2, 5],
            min_samples_split: vec![2],
        };
        let candidates = expand_forest_grid(&grid, 42, 3.0);

        let outcome = grid_search(&features, &labels, candidates, 3, 42).unwrap();
        assert_eq!(outcome.n_candidates, 2);
        // Cleanly separable clusters should cross-validate near perfectly
        assert!(outcome.best_f1 > 0.9);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let (features, labels) = separable_data();
        let result = grid_search(&features, &labels, Vec::new(), 3, 42);
        assert!(matches!(result, Err(TrainError::EmptyGrid(_))));
    }
}

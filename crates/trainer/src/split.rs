//! Stratified Splitting

use crate::TrainError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Class imbalance ratio: healthy count over faulty count.
///
/// Passed to the estimator as its class-weighting signal. Errors if
/// either class is absent, since weighting (and stratification) is then
/// meaningless.
pub fn imbalance_ratio(labels: &[u8]) -> Result<f64, TrainError> {
    let positives = labels.iter().filter(|&&y| y == 1).count();
    let negatives = labels.len() - positives;

    if positives == 0 || negatives == 0 {
        return Err(TrainError::DegenerateData(
            "both label classes must be present".to_string(),
        ));
    }
    Ok(negatives as f64 / positives as f64)
}

/// Stratified train/holdout split preserving the label ratio.
///
/// Returns `(train_indices, test_indices)`. Deterministic for a fixed
/// seed.
pub fn stratified_split(
    labels: &[u8],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), TrainError> {
    imbalance_ratio(labels)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &y)| y == class)
            .map(|(i, _)| i)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = ((indices.len() as f64) * test_size).round() as usize;
        // Keep at least one row of each class on both sides
        let n_test = n_test.clamp(1, indices.len().saturating_sub(1).max(1));

        test.extend(indices.drain(..n_test));
        train.extend(indices);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

/// Stratified k-fold assignment: each inner vec is one fold's validation
/// indices. Folds are disjoint and cover every row; each fold's class
/// ratio tracks the overall ratio.
pub fn stratified_kfold(labels: &[u8], k: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut folds = vec![Vec::new(); k.max(1)];

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &y)| y == class)
            .map(|(i, _)| i)
            .collect();
        indices.shuffle(&mut rng);

        // Deal rows round-robin across folds
        let num_folds = folds.len();
        for (i, index) in indices.into_iter().enumerate() {
            folds[i % num_folds].push(index);
        }
    }

    for fold in &mut folds {
        fold.sort_unstable();
    }
    folds
}

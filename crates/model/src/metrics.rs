//! Binary Classification Metrics

/// Confusion-matrix counts for the positive (faulty) class
#[derive(Debug, Clone, Copy, Default)]
pub struct Confusion {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl Confusion {
    /// Tally predictions against actual labels.
    pub fn from_predictions(actual: &[u8], predicted: &[u8]) -> Self {
        let mut c = Self::default();
        for (&y, &p) in actual.iter().zip(predicted) {
            match (y, p) {
                (1, 1) => c.true_positive += 1,
                (0, 1) => c.false_positive += 1,
                (0, 0) => c.true_negative += 1,
                _ => c.false_negative += 1,
            }
        }
        c
    }

    /// TP / (TP + FP); 0 when nothing was predicted positive
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positive + self.false_positive;
        if denominator == 0 {
            0.0
        } else {
            self.true_positive as f64 / denominator as f64
        }
    }

    /// TP / (TP + FN); 0 when no positives exist
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positive + self.false_negative;
        if denominator == 0 {
            0.0
        } else {
            self.true_positive as f64 / denominator as f64
        }
    }

    /// Harmonic mean of precision and recall
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Fraction of correct predictions
    pub fn accuracy(&self) -> f64 {
        let total = self.true_positive + self.false_positive + self.true_negative + self.false_negative;
        if total == 0 {
            0.0
        } else {
            (self.true_positive + self.true_negative) as f64 / total as f64
        }
    }
}

/// F1 score of `predicted` against `actual`
pub fn f1_score(actual: &[u8], predicted: &[u8]) -> f64 {
    Confusion::from_predictions(actual, predicted).f1()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let y = [0, 1, 0, 1, 1];
        assert_eq!(f1_score(&y, &y), 1.0);
    }

    #[test]
    fn test_known_confusion_counts() {
        let actual = [1, 1, 1, 0, 0, 0];
        let predicted = [1, 1, 0, 1, 0, 0];
        let c = Confusion::from_predictions(&actual, &predicted);

        assert_eq!(c.true_positive, 2);
        assert_eq!(c.false_negative, 1);
        assert_eq!(c.false_positive, 1);
        assert_eq!(c.true_negative, 2);
        assert!((c.precision() - 2.0 / 3.0).abs() < 1e-9);
        assert!((c.recall() - 2.0 / 3.0).abs() < 1e-9);
        assert!((c.f1() - 2.0 / 3.0).abs() < 1e-9);
        assert!((c.accuracy() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_positive_predictions() {
        let actual = [1, 1, 0];
        let predicted = [0, 0, 0];
        let c = Confusion::from_predictions(&actual, &predicted);
        assert_eq!(c.precision(), 0.0);
        assert_eq!(c.recall(), 0.0);
        assert_eq!(c.f1(), 0.0);
    }
}

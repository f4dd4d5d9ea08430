//! Classification metrics for model evaluation
//!
//! Weighted variants average per-class scores weighted by class frequency
//! in the actual labels, so they stay meaningful on imbalanced data.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct ClassCounts {
    true_positive: usize,
    false_positive: usize,
    false_negative: usize,
    support: usize,
}

fn class_counts(actual: &[i64], predicted: &[i64]) -> BTreeMap<i64, ClassCounts> {
    let mut counts: BTreeMap<i64, ClassCounts> = BTreeMap::new();
    for (&a, &p) in actual.iter().zip(predicted) {
        counts.entry(a).or_default().support += 1;
        if a == p {
            counts.entry(a).or_default().true_positive += 1;
        } else {
            counts.entry(p).or_default().false_positive += 1;
            counts.entry(a).or_default().false_negative += 1;
        }
    }
    counts
}

fn precision_of(c: &ClassCounts) -> f64 {
    let denom = c.true_positive + c.false_positive;
    if denom == 0 {
        0.0
    } else {
        c.true_positive as f64 / denom as f64
    }
}

fn recall_of(c: &ClassCounts) -> f64 {
    let denom = c.true_positive + c.false_negative;
    if denom == 0 {
        0.0
    } else {
        c.true_positive as f64 / denom as f64
    }
}

fn f1_of(c: &ClassCounts) -> f64 {
    let p = precision_of(c);
    let r = recall_of(c);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

fn weighted_by_support(actual: &[i64], predicted: &[i64], score: fn(&ClassCounts) -> f64) -> f64 {
    let total = actual.len();
    if total == 0 {
        return 0.0;
    }
    class_counts(actual, predicted)
        .values()
        .filter(|c| c.support > 0)
        .map(|c| c.support as f64 / total as f64 * score(c))
        .sum()
}

/// Fraction of predictions equal to the actual label.
pub fn accuracy(actual: &[i64], predicted: &[i64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| a == p)
        .count();
    correct as f64 / actual.len() as f64
}

pub fn weighted_precision(actual: &[i64], predicted: &[i64]) -> f64 {
    weighted_by_support(actual, predicted, precision_of)
}

pub fn weighted_recall(actual: &[i64], predicted: &[i64]) -> f64 {
    weighted_by_support(actual, predicted, recall_of)
}

pub fn weighted_f1(actual: &[i64], predicted: &[i64]) -> f64 {
    weighted_by_support(actual, predicted, f1_of)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_predictions() {
        let actual = [0, 1, 1, 0];
        assert!(close(accuracy(&actual, &actual), 1.0));
        assert!(close(weighted_precision(&actual, &actual), 1.0));
        assert!(close(weighted_recall(&actual, &actual), 1.0));
        assert!(close(weighted_f1(&actual, &actual), 1.0));
    }

    #[test]
    fn test_hand_computed_example() {
        // class 0: tp=2 fn=1 fp=0 support=3; class 1: tp=1 fp=1 fn=0 support=1
        let actual = [0, 0, 0, 1];
        let predicted = [0, 0, 1, 1];

        assert!(close(accuracy(&actual, &predicted), 0.75));
        // 0.75 * 1.0 + 0.25 * 0.5
        assert!(close(weighted_precision(&actual, &predicted), 0.875));
        // 0.75 * (2/3) + 0.25 * 1.0
        assert!(close(weighted_recall(&actual, &predicted), 0.75));
        // 0.75 * 0.8 + 0.25 * (2/3)
        assert!(close(weighted_f1(&actual, &predicted), 0.6 + 1.0 / 6.0));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(accuracy(&[], &[]), 0.0);
        assert_eq!(weighted_f1(&[], &[]), 0.0);
    }
}

//! ROC AUC via the Mann-Whitney U statistic.

use std::cmp::Ordering;

/// Area under the ROC curve for scores where higher means "more likely positive".
///
/// Tied scores share their average rank. Returns 0.5 when either side is empty.
pub fn roc_auc(positive: &[f32], negative: &[f32]) -> f64 {
    if positive.is_empty() || negative.is_empty() {
        return 0.5;
    }

    let mut scored: Vec<(f32, bool)> = positive
        .iter()
        .map(|&s| (s, true))
        .chain(negative.iter().map(|&s| (s, false)))
        .collect();
    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut positive_rank_sum = 0.0f64;
    let mut start = 0;
    while start < scored.len() {
        let mut end = start + 1;
        while end < scored.len() && scored[end].0 == scored[start].0 {
            end += 1;
        }
        // 1-based ranks start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        let tied_positives = scored[start..end].iter().filter(|(_, pos)| *pos).count();
        positive_rank_sum += rank * tied_positives as f64;
        start = end;
    }

    let p = positive.len() as f64;
    let n = negative.len() as f64;
    let u = positive_rank_sum - p * (p + 1.0) / 2.0;
    (u / (p * n)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_and_inverted() {
        assert!((roc_auc(&[0.8, 0.9], &[0.1, 0.2, 0.3]) - 1.0).abs() < 1e-12);
        assert!(roc_auc(&[0.1, 0.2], &[0.8, 0.9]).abs() < 1e-12);
    }

    #[test]
    fn test_ties_count_half() {
        assert!((roc_auc(&[0.5; 3], &[0.5; 4]) - 0.5).abs() < 1e-12);
        // pos 0.5 ties neg 0.5 (half), beats neg 0.1
        assert!((roc_auc(&[0.5], &[0.5, 0.1]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        // ranks: 1(N) 2(N) 3(P) 4(N) 5(P) -> U = 8 - 3 = 5 of 6
        let auc = roc_auc(&[3.0, 5.0], &[1.0, 2.0, 4.0]);
        assert!((auc - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_side() {
        assert_eq!(roc_auc(&[], &[1.0]), 0.5);
        assert_eq!(roc_auc(&[1.0], &[]), 0.5);
    }
}

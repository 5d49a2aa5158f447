//! Inverse-distance weighted regression and the confidence heuristic

use super::neighbors::Neighbor;
use super::stats::FeatureStats;
use super::{Confidence, ConfidencePolicy};

/// Raw regression output before it is wrapped into a `Prediction`
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub predicted_ms: f64,
    pub std_dev_ms: f64,
    pub avg_distance: f64,
    pub confidence: Confidence,
}

/// Weighted mean of neighbor durations with `w = 1 / (distance + epsilon)`.
///
/// Returns `None` for an empty neighbor set.
pub fn weighted_average(neighbors: &[Neighbor], epsilon: f64) -> Option<f64> {
    if neighbors.is_empty() {
        return None;
    }

    let (weighted_sum, total_weight) = neighbors.iter().fold((0.0, 0.0), |(sum, total), n| {
        let weight = 1.0 / (n.distance + epsilon);
        (sum + weight * n.duration_ms, total + weight)
    });

    Some(weighted_sum / total_weight)
}

/// Classify how much to trust a prediction.
///
/// Spread is the neighbors' std relative to their mean; distance is the
/// mean neighbor distance in normalized space. First matching tier wins.
pub fn classify(
    spread: &FeatureStats,
    avg_distance: f64,
    policy: &ConfidencePolicy,
) -> Confidence {
    if spread.std < spread.mean * policy.high_spread && avg_distance < policy.high_distance {
        Confidence::High
    } else if spread.std < spread.mean * policy.medium_spread
        && avg_distance < policy.medium_distance
    {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Combine the selected neighbors into a prediction
pub fn regress(
    neighbors: &[Neighbor],
    epsilon: f64,
    policy: &ConfidencePolicy,
) -> Option<Regression> {
    let predicted_ms = weighted_average(neighbors, epsilon)?;

    let spread = FeatureStats::from_values(neighbors.iter().map(|n| n.duration_ms));
    let avg_distance =
        neighbors.iter().map(|n| n.distance).sum::<f64>() / neighbors.len() as f64;

    Some(Regression {
        predicted_ms,
        std_dev_ms: spread.std,
        avg_distance,
        confidence: classify(&spread, avg_distance, policy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPS: f64 = 1e-9;

    fn neighbor(distance: f64, duration_ms: f64) -> Neighbor {
        Neighbor {
            distance,
            duration_ms,
        }
    }

    #[test]
    fn test_empty_has_no_average() {
        assert_eq!(weighted_average(&[], EPS), None);
        assert_eq!(regress(&[], EPS, &ConfidencePolicy::default()), None);
    }

    #[test]
    fn test_closer_neighbor_dominates() {
        let near = [neighbor(0.1, 100.0), neighbor(1.0, 200.0)];
        let avg = weighted_average(&near, EPS).unwrap();
        // weights 10 and 1
        assert_relative_eq!(avg, (10.0 * 100.0 + 200.0) / 11.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_distance_is_guarded() {
        let avg = weighted_average(&[neighbor(0.0, 80.0), neighbor(2.0, 500.0)], EPS).unwrap();
        assert!(avg.is_finite());
        assert_relative_eq!(avg, 80.0, epsilon = 1e-6);
    }

    #[test]
    fn test_weighted_average_is_monotonic() {
        let base = [neighbor(0.5, 100.0), neighbor(1.0, 150.0), neighbor(2.0, 300.0)];
        let before = weighted_average(&base, EPS).unwrap();
        for i in 0..base.len() {
            let mut bumped = base;
            bumped[i].duration_ms += 25.0;
            let after = weighted_average(&bumped, EPS).unwrap();
            assert!(after >= before, "raising neighbor {i} lowered the prediction");
        }
    }

    #[test]
    fn test_confidence_tiers() {
        let policy = ConfidencePolicy::default();
        let tight = FeatureStats { mean: 100.0, std: 10.0 };
        let loose = FeatureStats { mean: 100.0, std: 30.0 };
        let wild = FeatureStats { mean: 100.0, std: 80.0 };

        assert_eq!(classify(&tight, 1.0, &policy), Confidence::High);
        assert_eq!(classify(&tight, 2.0, &policy), Confidence::Medium);
        assert_eq!(classify(&loose, 1.0, &policy), Confidence::Medium);
        assert_eq!(classify(&loose, 3.0, &policy), Confidence::Low);
        assert_eq!(classify(&wild, 0.0, &policy), Confidence::Low);
    }

    #[test]
    fn test_confidence_thresholds_are_strict() {
        let policy = ConfidencePolicy::default();
        // std exactly 20% of mean is not "high"
        let edge = FeatureStats { mean: 100.0, std: 20.0 };
        assert_eq!(classify(&edge, 0.0, &policy), Confidence::Medium);
        let tight = FeatureStats { mean: 100.0, std: 1.0 };
        assert_eq!(classify(&tight, 1.5, &policy), Confidence::Medium);
    }

    #[test]
    fn test_custom_policy() {
        let strict = ConfidencePolicy {
            high_spread: 0.01,
            high_distance: 0.1,
            medium_spread: 0.05,
            medium_distance: 0.5,
        };
        let stats = FeatureStats { mean: 100.0, std: 10.0 };
        assert_eq!(classify(&stats, 0.0, &strict), Confidence::Low);
    }

    #[test]
    fn test_regress_summary() {
        let neighbors = [neighbor(0.2, 100.0), neighbor(0.4, 110.0), neighbor(0.6, 90.0)];
        let result = regress(&neighbors, EPS, &ConfidencePolicy::default()).unwrap();
        assert_relative_eq!(result.avg_distance, 0.4, epsilon = 1e-12);
        assert_relative_eq!(result.std_dev_ms, 10.0, epsilon = 1e-9);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.predicted_ms > 90.0 && result.predicted_ms < 110.0);
    }
}

//! k-nearest-neighbor runtime prediction
//!
//! Pure pipeline over one batch of historical runs for a single tool:
//!
//! ```text
//! records -> IQR outlier filter -> z-score feature space -> k nearest -> IDW regression
//! ```
//!
//! Nothing here touches the filesystem, the clock or global state. Callers
//! fetch the batch (see [`crate::telemetry`]) and render the outcome (see
//! [`crate::report`]).
//!
//! # Example
//!
//! ```
//! use fmetrics::knn::{predict, Confidence, HistoricalRecord, PredictionOutcome, PredictorConfig, QueryPoint};
//!
//! let batch: Vec<_> = [50.0, 52.0, 48.0, 51.0, 49.0]
//!     .iter()
//!     .map(|&ms| HistoricalRecord::new(100, 1000, 1, ms))
//!     .collect();
//!
//! match predict(&batch, &QueryPoint::new(100, 1000, 1), &PredictorConfig::default()) {
//!     PredictionOutcome::Predicted(p) => {
//!         assert_eq!(p.predicted_ms(), 50);
//!         assert_eq!(p.confidence, Confidence::High);
//!     }
//!     PredictionOutcome::InsufficientData(_) => unreachable!(),
//! }
//! ```

pub mod neighbors;
pub mod outliers;
pub mod regression;
pub mod stats;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub use neighbors::{nearest_neighbors, FeatureSpace, Neighbor};
pub use outliers::filter_outliers_iqr;
pub use regression::{classify, regress, weighted_average, Regression};
pub use stats::FeatureStats;

pub const DEFAULT_K: usize = 5;
pub const DEFAULT_MIN_SAMPLES: usize = 5;
pub const DEFAULT_IQR_FACTOR: f64 = 1.5;
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// One successful historical run of a tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub items_scanned: i64,
    /// `-1` when the tool did not measure bytes
    pub bytes_scanned: i64,
    pub depth: i64,
    pub duration_ms: f64,
}

impl HistoricalRecord {
    pub fn new(items_scanned: i64, bytes_scanned: i64, depth: i64, duration_ms: f64) -> Self {
        Self {
            items_scanned,
            bytes_scanned,
            depth,
            duration_ms,
        }
    }
}

/// Workload shape to predict for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub items: i64,
    pub bytes: i64,
    pub depth: i64,
}

impl QueryPoint {
    pub fn new(items: i64, bytes: i64, depth: i64) -> Self {
        Self {
            items,
            bytes,
            depth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    /// No prediction could be made
    None,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::None => "none",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds for the confidence heuristic.
///
/// Spreads are fractions of the neighbors' mean duration; distances are in
/// normalized (z-score) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    pub high_spread: f64,
    pub high_distance: f64,
    pub medium_spread: f64,
    pub medium_distance: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            high_spread: 0.2,
            high_distance: 1.5,
            medium_spread: 0.5,
            medium_distance: 3.0,
        }
    }
}

/// Tunables for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Neighbors to average over
    pub k: usize,
    /// Fewest runs (before and after outlier filtering) worth predicting from
    pub min_samples: usize,
    pub iqr_factor: f64,
    /// Added to every distance before inverting it into a weight
    pub epsilon: f64,
    pub confidence: ConfidencePolicy,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            min_samples: DEFAULT_MIN_SAMPLES,
            iqr_factor: DEFAULT_IQR_FACTOR,
            epsilon: DEFAULT_EPSILON,
            confidence: ConfidencePolicy::default(),
        }
    }
}

impl PredictorConfig {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Reject settings that would make the pipeline meaningless
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            bail!("k must be at least 1");
        }
        if self.min_samples == 0 {
            bail!("min_samples must be at least 1");
        }
        if !self.iqr_factor.is_finite() || self.iqr_factor < 0.0 {
            bail!("iqr_factor must be finite and non-negative, got {}", self.iqr_factor);
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            bail!("epsilon must be finite and positive, got {}", self.epsilon);
        }
        Ok(())
    }
}

/// A successful prediction for one tool
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub predicted_duration: f64,
    /// Unweighted sample std of the neighbors' durations
    pub neighbor_std_dev: f64,
    pub confidence: Confidence,
    /// Neighbors actually used; below the requested k for small batches
    pub k_used: usize,
    pub avg_neighbor_distance: f64,
    /// Nearest first
    pub neighbor_durations: Vec<f64>,
    /// Size of the batch after outlier filtering
    pub sample_count: usize,
}

impl Prediction {
    /// Predicted duration rounded to whole milliseconds (ties to even)
    pub fn predicted_ms(&self) -> i64 {
        self.predicted_duration.round_ties_even() as i64
    }

    pub fn std_dev_ms(&self) -> i64 {
        self.neighbor_std_dev.round_ties_even() as i64
    }

    /// Average neighbor distance to three decimal places.
    ///
    /// Rounds the float's exact decimal expansion, so 2.1105 (stored just
    /// above the tie) becomes 2.111. Scaling by 1000 first would land on an
    /// exact tie and round down.
    pub fn avg_distance_rounded(&self) -> f64 {
        format!("{:.3}", self.avg_neighbor_distance)
            .parse()
            .unwrap_or(self.avg_neighbor_distance)
    }

    /// Neighbor durations truncated to whole milliseconds
    pub fn neighbor_durations_ms(&self) -> Vec<i64> {
        self.neighbor_durations.iter().map(|&d| d as i64).collect()
    }
}

/// Not enough history to predict from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientData {
    /// Runs supplied by the caller
    pub sample_count: usize,
    /// Runs left after outlier filtering (equal to `sample_count` when the
    /// batch was rejected before filtering)
    pub filtered_count: usize,
    pub min_samples: usize,
}

impl InsufficientData {
    pub fn message(&self) -> String {
        format!(
            "insufficient data, need {} samples, have {}",
            self.min_samples, self.sample_count
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Predicted(Prediction),
    InsufficientData(InsufficientData),
}

impl PredictionOutcome {
    pub fn confidence(&self) -> Confidence {
        match self {
            PredictionOutcome::Predicted(p) => p.confidence,
            PredictionOutcome::InsufficientData(_) => Confidence::None,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            PredictionOutcome::Predicted(p) => Some(p),
            PredictionOutcome::InsufficientData(_) => None,
        }
    }
}

/// Predict the runtime of `query` from one tool's history.
///
/// Deterministic for identical inputs. `config.k` is treated as at least 1.
pub fn predict(
    batch: &[HistoricalRecord],
    query: &QueryPoint,
    config: &PredictorConfig,
) -> PredictionOutcome {
    let insufficient = |filtered_count| {
        PredictionOutcome::InsufficientData(InsufficientData {
            sample_count: batch.len(),
            filtered_count,
            min_samples: config.min_samples,
        })
    };

    if batch.len() < config.min_samples {
        return insufficient(batch.len());
    }

    let filtered = filter_outliers_iqr(batch, config.iqr_factor);
    if filtered.len() < config.min_samples {
        return insufficient(filtered.len());
    }

    let neighbors = nearest_neighbors(&filtered, query, config.k.max(1));
    let Some(regression) = regress(&neighbors, config.epsilon, &config.confidence) else {
        return insufficient(filtered.len());
    };

    PredictionOutcome::Predicted(Prediction {
        predicted_duration: regression.predicted_ms,
        neighbor_std_dev: regression.std_dev_ms,
        confidence: regression.confidence,
        k_used: neighbors.len(),
        avg_neighbor_distance: regression.avg_distance,
        neighbor_durations: neighbors.iter().map(|n| n.duration_ms).collect(),
        sample_count: filtered.len(),
    })
}

//! Per-feature statistics and z-score normalization

use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation of one feature over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    /// Sample std (`n - 1` divisor). Zero for fewer than two values.
    pub std: f64,
}

impl FeatureStats {
    /// Compute stats over a sequence of values.
    ///
    /// An empty sequence yields `(0, 0)`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        if values.len() < 2 {
            return Self { mean, std: 0.0 };
        }

        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Self {
            mean,
            std: variance.sqrt(),
        }
    }

    /// Z-score a value against these stats.
    ///
    /// A zero-variance feature collapses to 0 for every input, which removes
    /// it from distance computations.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            return 0.0;
        }
        (value - self.mean) / self.std
    }
}

//! Predictor configuration
//!
//! Reads `~/.fsuite/fmetrics.toml` (or an explicit `--config` file). Every
//! key is optional; a missing file means built-in defaults.
//!
//! ```toml
//! [predict]
//! k = 7
//! min_samples = 10
//! iqr_factor = 3.0
//!
//! [predict.confidence]
//! high_spread = 0.1
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fmetrics::config;
//!
//! let predictor = config::resolve(None, Some(3))?;
//! assert_eq!(predictor.k, 3);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

use anyhow::Result;
use std::path::Path;

use crate::knn::PredictorConfig;

pub use internal::FmetricsConfig;

/// Load a config file. Returns defaults if the file doesn't exist.
pub fn load(path: &Path) -> Result<FmetricsConfig> {
    internal::load(path)
}

/// Build the predictor settings for one run.
///
/// Reads `config_path` (default `~/.fsuite/fmetrics.toml`), applies CLI
/// overrides, and validates the result.
pub fn resolve(config_path: Option<&Path>, k_override: Option<usize>) -> Result<PredictorConfig> {
    internal::resolve(config_path, k_override)
}

//! Internal implementation for config module

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::knn::PredictorConfig;
use crate::paths;

/// Contents of `fmetrics.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FmetricsConfig {
    #[serde(default)]
    pub predict: PredictorConfig,
}

pub fn load(path: &Path) -> Result<FmetricsConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(FmetricsConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn resolve(config_path: Option<&Path>, k_override: Option<usize>) -> Result<PredictorConfig> {
    let file_config = match config_path {
        Some(path) => load(path)?,
        None => load(&paths::config_path())?,
    };

    let mut predictor = file_config.predict;
    if let Some(k) = k_override {
        predictor.k = k;
    }

    predictor.validate().context("Invalid predictor configuration")?;
    Ok(predictor)
}

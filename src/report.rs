//! Combined prediction report across tools
//!
//! Serializes to the same JSON shape fsuite consumers already parse.

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::knn::{self, Confidence, PredictionOutcome, PredictorConfig, QueryPoint};
use crate::telemetry::TelemetryDatabase;

pub const REPORT_TOOL: &str = "fmetrics";
pub const REPORT_SUBCOMMAND: &str = "predict";
pub const REPORT_METHOD: &str = "knn_regression";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetFeatures {
    pub items: i64,
    pub bytes: i64,
    pub depth: i64,
}

impl From<QueryPoint> for TargetFeatures {
    fn from(query: QueryPoint) -> Self {
        Self {
            items: query.items,
            bytes: query.bytes,
            depth: query.depth,
        }
    }
}

/// Per-tool entry in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolPrediction {
    Predicted {
        tool: String,
        predicted_ms: i64,
        std_dev_ms: i64,
        confidence: Confidence,
        k_used: usize,
        avg_neighbor_distance: f64,
        neighbor_durations: Vec<i64>,
        /// Runs in the store before outlier filtering
        samples: usize,
    },
    Insufficient {
        tool: String,
        /// Always -1
        predicted_ms: i64,
        confidence: Confidence,
        samples: usize,
        error: String,
    },
}

impl ToolPrediction {
    pub fn from_outcome(tool: &str, outcome: &PredictionOutcome, samples: usize) -> Self {
        match outcome {
            PredictionOutcome::Predicted(p) => ToolPrediction::Predicted {
                tool: tool.to_string(),
                predicted_ms: p.predicted_ms(),
                std_dev_ms: p.std_dev_ms(),
                confidence: p.confidence,
                k_used: p.k_used,
                avg_neighbor_distance: p.avg_distance_rounded(),
                neighbor_durations: p.neighbor_durations_ms(),
                samples,
            },
            PredictionOutcome::InsufficientData(info) => ToolPrediction::Insufficient {
                tool: tool.to_string(),
                predicted_ms: -1,
                confidence: Confidence::None,
                samples: info.sample_count,
                error: info.message(),
            },
        }
    }

    pub fn tool(&self) -> &str {
        match self {
            ToolPrediction::Predicted { tool, .. } | ToolPrediction::Insufficient { tool, .. } => {
                tool
            }
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            ToolPrediction::Predicted { confidence, .. }
            | ToolPrediction::Insufficient { confidence, .. } => *confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictReport {
    pub tool: &'static str,
    pub version: &'static str,
    pub subcommand: &'static str,
    pub method: &'static str,
    pub k: usize,
    pub target_features: TargetFeatures,
    pub predictions: Vec<ToolPrediction>,
    pub total_historical_samples: usize,
}

impl PredictReport {
    pub fn new(
        k: usize,
        query: QueryPoint,
        predictions: Vec<ToolPrediction>,
        total_historical_samples: usize,
    ) -> Self {
        Self {
            tool: REPORT_TOOL,
            version: env!("CARGO_PKG_VERSION"),
            subcommand: REPORT_SUBCOMMAND,
            method: REPORT_METHOD,
            k,
            target_features: query.into(),
            predictions,
            total_historical_samples,
        }
    }

    /// Human-readable rendering
    pub fn render_pretty(&self) -> String {
        let t = &self.target_features;
        let mut out = String::new();
        out.push_str(&format!(
            "fmetrics predict -- k-NN Regression (k={})\n",
            self.k
        ));
        out.push_str(&format!("{}\n", "=".repeat(44)));
        out.push_str(&format!(
            "  Target: {} items, {} bytes, depth {}\n",
            t.items, t.bytes, t.depth
        ));
        out.push_str(&format!(
            "  Historical samples: {}\n\n",
            self.total_historical_samples
        ));

        for entry in &self.predictions {
            match entry {
                ToolPrediction::Predicted {
                    tool,
                    predicted_ms,
                    std_dev_ms,
                    confidence,
                    samples,
                    ..
                } => out.push_str(&format!(
                    "  {tool:<12} ~{predicted_ms}ms +/-{std_dev_ms}ms  [{confidence}] ({samples} samples)\n"
                )),
                ToolPrediction::Insufficient { tool, error, .. } => {
                    out.push_str(&format!("  {tool:<12} -- {error}\n"))
                }
            }
        }
        out
    }
}

/// Predict every tool in `tools` from the store and assemble the report.
///
/// History is read on the calling thread; the per-tool pipelines then run
/// in parallel since they share nothing.
pub fn build_report(
    db: &TelemetryDatabase,
    tools: &[String],
    query: QueryPoint,
    config: &PredictorConfig,
) -> Result<PredictReport> {
    let total_samples = db.total_successful_samples()?;

    let batches = tools
        .iter()
        .map(|tool| -> Result<_> { Ok((tool.as_str(), db.tool_samples(tool)?)) })
        .collect::<Result<Vec<_>>>()?;

    let predictions: Vec<ToolPrediction> = batches
        .par_iter()
        .map(|(tool, batch)| {
            let outcome = knn::predict(batch, &query, config);
            debug!(
                tool,
                samples = batch.len(),
                confidence = %outcome.confidence(),
                "prediction finished"
            );
            ToolPrediction::from_outcome(tool, &outcome, batch.len())
        })
        .collect();

    Ok(PredictReport::new(config.k, query, predictions, total_samples))
}

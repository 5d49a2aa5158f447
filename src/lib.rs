pub mod config;
pub mod knn;
pub mod logging;
pub mod paths;
pub mod report;
pub mod telemetry;

// Re-export commonly used types
pub use knn::{predict, HistoricalRecord, Prediction, PredictionOutcome, PredictorConfig, QueryPoint};
pub use report::PredictReport;
pub use telemetry::TelemetryDatabase;

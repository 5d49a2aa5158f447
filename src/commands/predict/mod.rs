//! Predict command - k-NN runtime estimates for fsuite tools
//!
//! Public interface:
//! - `execute()` - load history, predict each tool, print the report
//! - `PredictOptions` - everything the CLI collected
//!
//! Store access and rendering live in `internal`

mod internal;

use anyhow::Result;
use std::path::PathBuf;

/// Report rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

/// Options for prediction
pub struct PredictOptions {
    /// Telemetry database (default: ~/.fsuite/telemetry.db)
    pub db: Option<PathBuf>,
    pub items: i64,
    /// -1 when unknown
    pub bytes: i64,
    pub depth: i64,
    /// Override k from config
    pub k: Option<usize>,
    /// Tools to predict (default: ftree, fsearch, fcontent)
    pub tools: Option<Vec<String>>,
    /// Config file (default: ~/.fsuite/fmetrics.toml)
    pub config: Option<PathBuf>,
    pub output: OutputFormat,
}

/// Execute prediction. Returns the process exit code.
pub fn execute(options: PredictOptions) -> Result<i32> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    internal::run(options, &mut stdout.lock(), &mut stderr.lock())
}

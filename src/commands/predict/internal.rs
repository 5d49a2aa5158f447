//! Internal implementation for the predict command

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use fmetrics::knn::QueryPoint;
use fmetrics::telemetry::{TelemetryDatabase, DEFAULT_TOOLS};
use fmetrics::{config, paths, report};

use super::{OutputFormat, PredictOptions};

/// Run one prediction, writing the report to `out` and human-facing errors
/// to `err`. Returns the process exit code.
pub fn run(options: PredictOptions, out: &mut impl Write, err: &mut impl Write) -> Result<i32> {
    let config_path = options.config.as_deref().map(paths::expand);
    let predictor = config::resolve(config_path.as_deref(), options.k)?;
    debug!(?predictor, "resolved predictor config");

    let db_path = options
        .db
        .as_deref()
        .map(paths::expand)
        .unwrap_or_else(paths::telemetry_db);

    let db = match TelemetryDatabase::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            debug!(path = %db_path.display(), "telemetry database unavailable");
            report_open_failure(options.output, &e, out, err)?;
            return Ok(1);
        }
    };

    let tools = selected_tools(options.tools);
    let query = QueryPoint::new(options.items, options.bytes, options.depth);
    let report = report::build_report(&db, &tools, query, &predictor)?;

    match options.output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
        OutputFormat::Pretty => write!(out, "{}", report.render_pretty())?,
    }
    out.flush()?;

    Ok(0)
}

/// JSON consumers get the error on stdout; humans get it on stderr
fn report_open_failure(
    output: OutputFormat,
    error: &anyhow::Error,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let message = format!("Cannot open database: {error:#}");
    match output {
        OutputFormat::Json => writeln!(out, "{}", json!({ "error": message }))?,
        OutputFormat::Pretty => writeln!(err, "{} {}", "error:".red().bold(), message)?,
    }
    Ok(())
}

/// Requested tools in order, deduplicated; defaults when none were given
fn selected_tools(requested: Option<Vec<String>>) -> Vec<String> {
    let mut tools: Vec<String> = Vec::new();
    for tool in requested.unwrap_or_default() {
        let tool = tool.trim();
        if !tool.is_empty() && !tools.iter().any(|t| t == tool) {
            tools.push(tool.to_string());
        }
    }

    if tools.is_empty() {
        DEFAULT_TOOLS.iter().map(|t| t.to_string()).collect()
    } else {
        tools
    }
}

//! Diagnostic logging
//!
//! Everything goes to stderr so the JSON report on stdout stays parseable.
//! Verbosity comes from `FMETRICS_LOG` (tracing `EnvFilter` syntax), e.g.
//! `FMETRICS_LOG=debug` or `FMETRICS_LOG=fmetrics::telemetry=debug`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "FMETRICS_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();

    tracing::debug!("Tracing initialized");
}

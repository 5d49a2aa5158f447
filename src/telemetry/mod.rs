//! fsuite telemetry store
//!
//! Read access to the SQLite database the fsuite tools append a row to after
//! every run. Only successful runs are handed to the predictor.
//!
//! # Example
//! ```no_run
//! use fmetrics::telemetry::TelemetryDatabase;
//!
//! let db = TelemetryDatabase::open("/home/me/.fsuite/telemetry.db")?;
//! let runs = db.tool_samples("ftree")?;
//! println!("{} usable ftree runs of {}", runs.len(), db.total_successful_samples()?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod sqlite;

pub use sqlite::{TelemetryDatabase, TelemetryRun};

/// Tools the predictor reports on by default, in report order
pub const DEFAULT_TOOLS: [&str; 3] = ["ftree", "fsearch", "fcontent"];

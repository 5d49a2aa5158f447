//! SQLite access to the `telemetry` table

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

use crate::knn::HistoricalRecord;

/// Columns the predictor relies on. The fsuite writer may add more.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS telemetry (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    tool          TEXT NOT NULL,
    exit_code     INTEGER NOT NULL,
    duration_ms   INTEGER NOT NULL,
    items_scanned INTEGER NOT NULL DEFAULT -1,
    bytes_scanned INTEGER NOT NULL DEFAULT -1,
    depth         INTEGER NOT NULL DEFAULT -1
);
CREATE INDEX IF NOT EXISTS idx_telemetry_tool ON telemetry(tool, exit_code);
";

/// One row to append, as an fsuite tool would after it exits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRun<'a> {
    pub tool: &'a str,
    pub exit_code: i64,
    pub duration_ms: f64,
    pub items_scanned: i64,
    pub bytes_scanned: i64,
    pub depth: i64,
}

impl<'a> TelemetryRun<'a> {
    /// A successful run
    pub fn ok(tool: &'a str, record: HistoricalRecord) -> Self {
        Self {
            tool,
            exit_code: 0,
            duration_ms: record.duration_ms,
            items_scanned: record.items_scanned,
            bytes_scanned: record.bytes_scanned,
            depth: record.depth,
        }
    }
}

/// Handle on an fsuite telemetry database
pub struct TelemetryDatabase {
    conn: Connection,
}

impl TelemetryDatabase {
    /// Open an existing telemetry database read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open telemetry database: {}", path.display()))?;

        debug!(path = %path.display(), "opened telemetry database");
        Ok(Self { conn })
    }

    /// Open (creating if needed) a writable database with the telemetry schema
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to create telemetry database: {}", path.display()))?;
        let db = Self { conn };
        db.create_schema()?;
        Ok(db)
    }

    /// Create an in-memory database for testing
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        let db = Self { conn };
        db.create_schema()?;
        Ok(db)
    }

    /// Create the `telemetry` table if it is missing
    pub fn create_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .context("Failed to create telemetry schema")?;
        Ok(())
    }

    /// Append one run
    pub fn record_run(&self, run: &TelemetryRun<'_>) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO telemetry (tool, exit_code, duration_ms, items_scanned, bytes_scanned, depth)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    run.tool,
                    run.exit_code,
                    run.duration_ms,
                    run.items_scanned,
                    run.bytes_scanned,
                    run.depth
                ],
            )
            .with_context(|| format!("Failed to record {} run", run.tool))?;
        Ok(())
    }

    /// Successful runs of `tool` with a measured item count, in insertion order
    pub fn tool_samples(&self, tool: &str) -> Result<Vec<HistoricalRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT items_scanned, bytes_scanned, depth, duration_ms
                 FROM telemetry
                 WHERE tool = ?1 AND exit_code = 0 AND items_scanned >= 0
                 ORDER BY rowid",
            )
            .context("Failed to prepare telemetry query")?;

        let records = stmt
            .query_map(params![tool], |row| {
                Ok(HistoricalRecord {
                    items_scanned: row.get(0)?,
                    bytes_scanned: row.get(1)?,
                    depth: row.get(2)?,
                    duration_ms: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read telemetry for {tool}"))?;

        debug!(tool, samples = records.len(), "loaded tool history");
        Ok(records)
    }

    /// Count of every successful run, across all tools
    pub fn total_successful_samples(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM telemetry WHERE exit_code = 0",
                [],
                |row| row.get(0),
            )
            .context("Failed to count telemetry samples")?;
        Ok(count.max(0) as usize)
    }
}

//! Filesystem layout shared with the rest of fsuite.
//!
//! ```text
//! ~/.fsuite/
//! ├── telemetry.db     # Run history written by ftree/fsearch/fcontent
//! └── fmetrics.toml    # Predictor settings (optional)
//! ```

use std::path::{Path, PathBuf};

/// fsuite home directory: `~/.fsuite/`
pub fn fsuite_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fsuite")
}

/// Telemetry database: `~/.fsuite/telemetry.db`
pub fn telemetry_db() -> PathBuf {
    fsuite_home().join("telemetry.db")
}

/// Predictor config: `~/.fsuite/fmetrics.toml`
pub fn config_path() -> PathBuf {
    fsuite_home().join("fmetrics.toml")
}

/// Expand `~` and `$VARS` in a user-supplied path
pub fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(&raw).into_owned()),
    }
}

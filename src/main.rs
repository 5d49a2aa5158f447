use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;

use commands::predict::{OutputFormat, PredictOptions};

#[derive(Parser)]
#[command(
    name = "fmetrics-predict",
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "k-NN runtime prediction for fsuite tools",
    long_about = None
)]
struct Cli {
    /// Path to telemetry.db (default: ~/.fsuite/telemetry.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Target items_scanned
    #[arg(long, allow_negative_numbers = true)]
    items: i64,

    /// Target bytes_scanned (-1 when unknown)
    #[arg(long, default_value = "-1", allow_negative_numbers = true)]
    bytes: i64,

    /// Target depth
    #[arg(long, default_value = "3")]
    depth: i64,

    /// Number of neighbors (default: from config, else 5)
    #[arg(long)]
    k: Option<usize>,

    /// Tools to predict (comma-separated, default: ftree,fsearch,fcontent)
    #[arg(long = "tool", value_delimiter = ',')]
    tools: Option<Vec<String>>,

    /// Predictor config file (default: ~/.fsuite/fmetrics.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    output: OutputFormat,
}

fn main() -> Result<()> {
    fmetrics::logging::init();
    let cli = Cli::parse();

    let exit_code = commands::predict::execute(PredictOptions {
        db: cli.db,
        items: cli.items,
        bytes: cli.bytes,
        depth: cli.depth,
        k: cli.k,
        tools: cli.tools,
        config: cli.config,
        output: cli.output,
    })?;

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["fmetrics-predict", "--items", "500"]).unwrap();
        assert_eq!(cli.items, 500);
        assert_eq!(cli.bytes, -1);
        assert_eq!(cli.depth, 3);
        assert_eq!(cli.k, None);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.db.is_none());
    }

    #[test]
    fn test_cli_full() {
        let cli = Cli::try_parse_from([
            "fmetrics-predict",
            "--db",
            "~/.fsuite/telemetry.db",
            "--items",
            "500",
            "--bytes",
            "10000000",
            "--depth",
            "2",
            "--k",
            "7",
            "--tool",
            "ftree,fcontent",
            "--output",
            "pretty",
        ])
        .unwrap();
        assert_eq!(cli.bytes, 10_000_000);
        assert_eq!(cli.k, Some(7));
        assert_eq!(
            cli.tools,
            Some(vec!["ftree".to_string(), "fcontent".to_string()])
        );
        assert_eq!(cli.output, OutputFormat::Pretty);
    }

    #[test]
    fn test_items_required() {
        assert!(Cli::try_parse_from(["fmetrics-predict"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

//! End-to-end: telemetry file on disk -> per-tool predictions -> JSON report

use anyhow::Result;
use fmetrics::knn::{Confidence, HistoricalRecord, PredictorConfig, QueryPoint};
use fmetrics::report::{build_report, ToolPrediction};
use fmetrics::telemetry::{TelemetryDatabase, TelemetryRun, DEFAULT_TOOLS};
use tempfile::TempDir;

fn default_tools() -> Vec<String> {
    DEFAULT_TOOLS.iter().map(|t| t.to_string()).collect()
}

/// ftree: plenty of tight history; fsearch: 3 runs; fcontent: nothing usable
fn seed(dir: &TempDir) -> Result<std::path::PathBuf> {
    let path = dir.path().join("telemetry.db");
    let db = TelemetryDatabase::create(&path)?;

    for i in 0..12 {
        let record = HistoricalRecord::new(400 + i * 20, 8_000_000 + i * 400_000, 3, 120.0 + i as f64);
        db.record_run(&TelemetryRun::ok("ftree", record))?;
    }
    // A pathological run that should be filtered out
    db.record_run(&TelemetryRun::ok(
        "ftree",
        HistoricalRecord::new(500, 10_000_000, 3, 12_000.0),
    ))?;
    // Failed runs never count
    db.record_run(&TelemetryRun {
        exit_code: 2,
        ..TelemetryRun::ok("ftree", HistoricalRecord::new(500, 10_000_000, 3, 1.0))
    })?;

    for ms in [30.0, 31.0, 29.0] {
        db.record_run(&TelemetryRun::ok("fsearch", HistoricalRecord::new(10, -1, 1, ms)))?;
    }

    db.record_run(&TelemetryRun {
        exit_code: 1,
        ..TelemetryRun::ok("fcontent", HistoricalRecord::new(10, 100, 1, 9.0))
    })?;

    Ok(path)
}

#[test]
fn test_report_from_disk() -> Result<()> {
    let dir = TempDir::new()?;
    let path = seed(&dir)?;

    let db = TelemetryDatabase::open(&path)?;
    let query = QueryPoint::new(500, 10_000_000, 3);
    let report = build_report(&db, &default_tools(), query, &PredictorConfig::default())?;

    assert_eq!(report.total_historical_samples, 16);
    assert_eq!(report.k, 5);
    assert_eq!(report.predictions.len(), 3);

    match &report.predictions[0] {
        ToolPrediction::Predicted {
            tool,
            predicted_ms,
            confidence,
            k_used,
            neighbor_durations,
            samples,
            ..
        } => {
            assert_eq!(tool, "ftree");
            assert_eq!(*samples, 13);
            assert_eq!(*k_used, 5);
            assert!(!neighbor_durations.contains(&12_000));
            assert!((120..=131).contains(predicted_ms));
            assert_eq!(*confidence, Confidence::High);
        }
        other => panic!("expected ftree prediction, got {other:?}"),
    }

    match &report.predictions[1] {
        ToolPrediction::Insufficient { samples, error, .. } => {
            assert_eq!(*samples, 3);
            assert_eq!(error, "insufficient data, need 5 samples, have 3");
        }
        other => panic!("expected insufficient fsearch, got {other:?}"),
    }

    assert_eq!(report.predictions[2].confidence(), Confidence::None);
    Ok(())
}

#[test]
fn test_json_shape() -> Result<()> {
    let dir = TempDir::new()?;
    let path = seed(&dir)?;

    let db = TelemetryDatabase::open(&path)?;
    let report = build_report(
        &db,
        &default_tools(),
        QueryPoint::new(500, 10_000_000, 3),
        &PredictorConfig::default().with_k(3),
    )?;
    let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&report)?)?;

    assert_eq!(value["tool"], "fmetrics");
    assert_eq!(value["method"], "knn_regression");
    assert_eq!(value["k"], 3);
    assert_eq!(value["target_features"]["bytes"], 10_000_000);

    let ftree = &value["predictions"][0];
    assert_eq!(ftree["tool"], "ftree");
    assert_eq!(ftree["k_used"], 3);
    assert!(ftree["avg_neighbor_distance"].is_f64());
    assert_eq!(ftree["neighbor_durations"].as_array().map(Vec::len), Some(3));

    let fcontent = &value["predictions"][2];
    assert_eq!(fcontent["predicted_ms"], -1);
    assert_eq!(fcontent["confidence"], "none");
    assert_eq!(fcontent["samples"], 0);
    assert!(fcontent.get("k_used").is_none());
    Ok(())
}

#[test]
fn test_lower_threshold_enables_small_tools() -> Result<()> {
    let dir = TempDir::new()?;
    let path = seed(&dir)?;

    let db = TelemetryDatabase::open(&path)?;
    let config = PredictorConfig {
        min_samples: 3,
        ..PredictorConfig::default()
    };
    let report = build_report(
        &db,
        &["fsearch".to_string()],
        QueryPoint::new(10, -1, 1),
        &config,
    )?;

    match &report.predictions[0] {
        ToolPrediction::Predicted {
            predicted_ms,
            k_used,
            ..
        } => {
            assert_eq!(*predicted_ms, 30);
            assert_eq!(*k_used, 3);
        }
        other => panic!("expected fsearch prediction, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_pretty_report() -> Result<()> {
    let dir = TempDir::new()?;
    let path = seed(&dir)?;

    let db = TelemetryDatabase::open(&path)?;
    let report = build_report(
        &db,
        &default_tools(),
        QueryPoint::new(500, 10_000_000, 3),
        &PredictorConfig::default(),
    )?;
    let text = report.render_pretty();

    assert!(text.starts_with("fmetrics predict -- k-NN Regression (k=5)\n"));
    assert!(text.contains("  Historical samples: 16\n"));
    assert!(text.contains("[high] (13 samples)"));
    assert!(text.contains("  fsearch      -- insufficient data, need 5 samples, have 3"));
    Ok(())
}

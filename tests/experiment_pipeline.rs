/// Integration tests for the experiment log pipeline
///
/// These tests verify:
/// 1. A log on disk is read, filtered, and closed
/// 2. A missing log is reported as an open failure
/// 3. Full pipeline: file → parse → summarize → chart file
/// 4. Config file overrides flow through to the rendered chart
///
/// Run with: cargo test --test experiment_pipeline

use flomon_plot::analysis::summary::summarize;
use flomon_plot::chart::{render_svg_string, render_to_file, ChartError};
use flomon_plot::config::{load_config, PlotConfig};
use flomon_plot::ingest::experiment::{read_experiment_file, HeaderMode};
use flomon_plot::model::IngestError;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Capture from a 2 s drain test: header line, a torn write, and a stray
// debug print from the logger
const TEST_LOG: &str = "Elapsed Time (ms),Distance (cm),Flow Rate (L/min)
0,18.20,0.00
400,18.05,0.95
800,17.80,1.40
dbg: flow pulses=57
1200,17.52,1.62
1600,17.
2000,16.98,1.70
";

fn write_log(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write test log");
    path
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

#[test]
fn test_read_experiment_file_filters_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "Experiment_values.txt", TEST_LOG);

    let outcome = read_experiment_file(path, HeaderMode::Detect)
        .expect("Failed to read test log");

    assert_eq!(outcome.rows_read, 8);
    assert_eq!(outcome.rows_skipped, 3, "header, debug line, and torn row");
    assert_eq!(outcome.series.times(), &[0.0, 400.0, 800.0, 1200.0, 2000.0]);
    assert_eq!(outcome.series.water_levels(), &[18.20, 18.05, 17.80, 17.52, 16.98]);
    assert_eq!(outcome.series.flow_rates(), &[0.00, 0.95, 1.40, 1.62, 1.70]);
}

#[test]
fn test_reading_twice_is_identical() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "log.txt", TEST_LOG);

    let first = read_experiment_file(&path, HeaderMode::Detect).unwrap();
    let second = read_experiment_file(path, HeaderMode::Detect).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_file_is_open_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("Experiment_values.txt");

    let err = read_experiment_file(&missing, HeaderMode::Detect)
        .expect_err("missing file must fail");

    match err {
        IngestError::Open { path, .. } => assert_eq!(path, missing),
        other => panic!("expected Open error, got {:?}", other),
    }
}

#[test]
fn test_empty_file_gives_empty_series() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "empty.txt", "");

    let outcome = read_experiment_file(path, HeaderMode::Detect).unwrap();
    assert!(outcome.series.is_empty());
    assert!(outcome.series.water_levels().is_empty());
    assert!(outcome.series.flow_rates().is_empty());
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_full_pipeline_log_to_svg_file() {
    let dir = TempDir::new().unwrap();
    let log_path = write_log(&dir, "Experiment_values.txt", TEST_LOG);
    let chart_path = dir.path().join("Experiment_values.svg");

    // Step 1: Read
    let outcome = read_experiment_file(log_path, HeaderMode::Detect).unwrap();

    // Step 2: Summarize
    let summary = summarize(&outcome);
    assert_eq!(summary.rows_accepted, 5);
    assert_eq!(summary.duration_ms, 2000.0);
    assert!(summary.total_volume_liters > 0.0);

    // Step 3: Render
    render_to_file(&outcome.series, &PlotConfig::default(), &chart_path)
        .expect("Failed to render chart");

    let svg = fs::read_to_string(&chart_path).expect("chart file should exist");
    assert!(svg.contains("Water Level (Ultrasonic Sensor)"));
    assert!(svg.contains("Flow Rate (YF-S401 Sensor)"));
}

#[test]
fn test_empty_log_still_renders() {
    let dir = TempDir::new().unwrap();
    let log_path = write_log(&dir, "empty.txt", "Elapsed Time (ms),Distance (cm),Flow Rate (L/min)\n");
    let chart_path = dir.path().join("empty.svg");

    let outcome = read_experiment_file(log_path, HeaderMode::Detect).unwrap();
    assert!(outcome.series.is_empty());

    render_to_file(&outcome.series, &PlotConfig::default(), &chart_path)
        .expect("empty series must render");
    assert!(chart_path.exists());
}

#[test]
fn test_png_without_font_support_is_reported() {
    if cfg!(feature = "ttf") {
        return;
    }
    let dir = TempDir::new().unwrap();
    let chart_path = dir.path().join("chart.png");

    let outcome = read_experiment_file(write_log(&dir, "log.txt", TEST_LOG), HeaderMode::Detect).unwrap();
    let result = render_to_file(&outcome.series, &PlotConfig::default(), &chart_path);

    assert!(matches!(result, Err(ChartError::MissingFontSupport)));
    assert!(!chart_path.exists());
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_file_overrides_reach_chart_and_reader() {
    let dir = TempDir::new().unwrap();
    let config_path = write_log(
        &dir,
        "plot.toml",
        r#"
[input]
header = "skip"

[output]
width = 640
height = 480

[water_level]
title = "Sump Level"
"#,
    );

    let config = load_config(config_path).expect("Failed to load config");
    assert_eq!(config.input.header, HeaderMode::Skip);

    // Numeric first line: only skip mode drops it
    let log_path = write_log(&dir, "log.txt", "1,2,3\n0,10.5,2.1\n10,10.2,2.0\n");
    let outcome = read_experiment_file(log_path, config.input.header).unwrap();
    assert_eq!(outcome.series.times(), &[0.0, 10.0]);

    let svg = render_svg_string(&outcome.series, &config).unwrap();
    assert!(svg.contains("Sump Level"));
    assert!(svg.contains("640"));
    assert!(svg.contains("Flow Rate (YF-S401 Sensor)"));
}

/// flomon_plot: water-level and flow-rate bench experiment plotter.
///
/// # Module structure
///
/// ```text
/// flomon_plot
/// ├── model       — shared data types (SensorReading, SensorSeries, IngestError, …)
/// ├── config      — chart/input configuration loader (plot.toml)
/// ├── ingest
/// │   ├── experiment — CSV row filter + experiment log reader
/// │   └── fixtures (test only) — representative serial captures
/// ├── analysis
/// │   └── summary — duration, channel statistics, integrated volume
/// └── chart       — two stacked line charts via plotters (SVG/PNG)
/// ```

/// Public modules
pub mod analysis;
pub mod chart;
pub mod config;
pub mod ingest;
pub mod model;

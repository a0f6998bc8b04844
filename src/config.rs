/// Plot configuration loader - parses plot.toml
///
/// Keeps chart titles, labels, colours, and file locations out of the code
/// so a different rig (another sensor, another tank) can be plotted without
/// recompiling. Every key is optional; anything missing falls back to the
/// defaults for the ultrasonic + YF-S401 bench.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ingest::experiment::{HeaderMode, DEFAULT_INPUT_FILE};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "plot.toml";

/// Default chart output path.
pub const DEFAULT_OUTPUT_FILE: &str = "Experiment_values.svg";

/// Resolved configuration with all defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    /// Upper chart: distance over time
    pub water_level: PanelConfig,
    /// Lower chart: flow rate over time
    pub flow_rate: PanelConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub path: PathBuf,
    pub header: HeaderMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Labels and styling for one of the two stacked charts.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend: String,
    pub color: [u8; 3],
}

impl PanelConfig {
    pub fn water_level() -> Self {
        PanelConfig {
            title: "Water Level (Ultrasonic Sensor)".to_string(),
            x_label: "Elapsed Time (ms)".to_string(),
            y_label: "Distance (cm)".to_string(),
            legend: "Distance (cm)".to_string(),
            color: [0, 0, 255],
        }
    }

    pub fn flow_rate() -> Self {
        PanelConfig {
            title: "Flow Rate (YF-S401 Sensor)".to_string(),
            x_label: "Elapsed Time (ms)".to_string(),
            y_label: "Flow Rate (L/min)".to_string(),
            legend: "Flow Rate (L/min)".to_string(),
            color: [255, 0, 0],
        }
    }

    fn apply(mut self, overrides: PanelSection) -> Self {
        if let Some(title) = overrides.title {
            self.title = title;
        }
        if let Some(x_label) = overrides.x_label {
            self.x_label = x_label;
        }
        if let Some(y_label) = overrides.y_label {
            self.y_label = y_label;
        }
        if let Some(legend) = overrides.legend {
            self.legend = legend;
        }
        if let Some(color) = overrides.color {
            self.color = color;
        }
        self
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            input: InputConfig {
                path: PathBuf::from(DEFAULT_INPUT_FILE),
                header: HeaderMode::Detect,
            },
            output: OutputConfig {
                path: PathBuf::from(DEFAULT_OUTPUT_FILE),
                width: 1000,
                height: 800,
            },
            water_level: PanelConfig::water_level(),
            flow_rate: PanelConfig::flow_rate(),
        }
    }
}

// ---------------------------------------------------------------------------
// TOML file layout (every key optional)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    input: InputSection,
    #[serde(default)]
    output: OutputSection,
    #[serde(default)]
    water_level: PanelSection,
    #[serde(default)]
    flow_rate: PanelSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputSection {
    path: Option<PathBuf>,
    header: Option<HeaderMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    path: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PanelSection {
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    legend: Option<String>,
    color: Option<[u8; 3]>,
}

/// Layers the file's keys over the built-in defaults.
fn resolve(file: ConfigFile) -> PlotConfig {
    let defaults = PlotConfig::default();
    PlotConfig {
        input: InputConfig {
            path: file.input.path.unwrap_or(defaults.input.path),
            header: file.input.header.unwrap_or(defaults.input.header),
        },
        output: OutputConfig {
            path: file.output.path.unwrap_or(defaults.output.path),
            width: file.output.width.unwrap_or(defaults.output.width),
            height: file.output.height.unwrap_or(defaults.output.height),
        },
        water_level: defaults.water_level.apply(file.water_level),
        flow_rate: defaults.flow_rate.apply(file.flow_rate),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read
    Read { path: PathBuf, source: io::Error },
    /// Config file is not valid TOML or has unknown keys
    Parse { path: PathBuf, source: toml::de::Error },
    /// Output canvas has a zero dimension
    InvalidCanvas { width: u32, height: u32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse {}: {}", path.display(), source)
            }
            ConfigError::InvalidCanvas { width, height } => {
                write!(f, "Invalid output size {}x{}: both dimensions must be non-zero", width, height)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str, path: &Path) -> Result<PlotConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let config = resolve(file);
    if config.output.width == 0 || config.output.height == 0 {
        return Err(ConfigError::InvalidCanvas {
            width: config.output.width,
            height: config.output.height,
        });
    }
    Ok(config)
}

/// Loads configuration from `path`. The file must exist.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlotConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents, path)
}

/// Loads configuration from `path`, or returns the defaults if the file
/// does not exist. Read and parse failures still propagate.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<PlotConfig, ConfigError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(PlotConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bench_setup() {
        let config = PlotConfig::default();
        assert_eq!(config.input.path, PathBuf::from("Experiment_values.txt"));
        assert_eq!(config.input.header, HeaderMode::Detect);
        assert_eq!(config.output.width, 1000);
        assert_eq!(config.output.height, 800);
        assert_eq!(config.water_level.title, "Water Level (Ultrasonic Sensor)");
        assert_eq!(config.flow_rate.title, "Flow Rate (YF-S401 Sensor)");
        assert_eq!(config.water_level.color, [0, 0, 255]);
        assert_eq!(config.flow_rate.color, [255, 0, 0]);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("", Path::new("plot.toml")).unwrap();
        assert_eq!(config, PlotConfig::default());
    }

    #[test]
    fn test_partial_panel_override_keeps_panel_defaults() {
        let toml_text = r#"
[flow_rate]
title = "Flow Rate (YF-S201 Sensor)"

[input]
header = "skip"
"#;
        let config = parse_config(toml_text, Path::new("plot.toml")).unwrap();

        assert_eq!(config.flow_rate.title, "Flow Rate (YF-S201 Sensor)");
        assert_eq!(config.flow_rate.y_label, "Flow Rate (L/min)");
        assert_eq!(config.flow_rate.color, [255, 0, 0]);
        assert_eq!(config.water_level, PanelConfig::water_level());
        assert_eq!(config.input.header, HeaderMode::Skip);
        assert_eq!(config.input.path, PathBuf::from("Experiment_values.txt"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = parse_config("[output]\nformat = \"png\"\n", Path::new("plot.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        let result = parse_config("[output]\nwidth = 0\n", Path::new("plot.toml"));
        assert!(matches!(result, Err(ConfigError::InvalidCanvas { width: 0, height: 800 })));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config_or_default("does-not-exist/plot.toml").unwrap();
        assert_eq!(config, PlotConfig::default());

        assert!(matches!(
            load_config("does-not-exist/plot.toml"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_repository_plot_toml_loads() {
        let config = load_config(DEFAULT_CONFIG_FILE).expect("plot.toml should parse");
        assert_eq!(config, PlotConfig::default(), "shipped plot.toml documents the defaults");
    }
}

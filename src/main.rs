//! Bench Experiment Plotter
//!
//! Reads the serial capture from a water-level / flow-rate experiment and
//! renders two stacked charts:
//! 1. Ultrasonic distance (cm) over elapsed time (ms)
//! 2. Flow rate (L/min) over elapsed time (ms)
//!
//! Rows that are not exactly three numbers are dropped, which is how the
//! capture's header line and any serial noise disappear.
//!
//! Usage:
//!   cargo run --release                               # Experiment_values.txt -> Experiment_values.svg
//!   cargo run --release -- --input run2.txt           # render run2.txt and open it in the viewer
//!   cargo run --release -- --no-show                  # write the chart file only
//!   cargo run --release -- --summary                  # also print run statistics
//!   cargo run --release -- --json                     # print statistics as JSON only
//!
//! Options:
//!   --config PATH     Plot configuration (default: plot.toml, optional)
//!   --input PATH      Experiment log (default: Experiment_values.txt)
//!   --output PATH     Chart image, .svg or .png (default: Experiment_values.svg)
//!   --skip-header     Always discard the first line of the log
//!   --summary         Print run statistics
//!   --json            Print run statistics as JSON (suppresses status output)
//!   --show            Open the rendered chart in the system viewer (default)
//!   --no-show         Write the chart file without opening it
//!   -h, --help        Print this usage and exit
//!   --verbose         Debug logging
//!
//! Environment:
//!   RUST_LOG - log filter (overrides --verbose)

use flomon_plot::analysis::summary::{format_summary, summarize};
use flomon_plot::chart::render_to_file;
use flomon_plot::config::{load_config, load_config_or_default, PlotConfig, DEFAULT_CONFIG_FILE};
use flomon_plot::ingest::experiment::{read_experiment_file, HeaderMode};
use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    skip_header: bool,
    summary: bool,
    json: bool,
    show: bool,
    verbose: bool,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            config: None,
            input: None,
            output: None,
            skip_header: false,
            summary: false,
            json: false,
            show: true,
            verbose: false,
            help: false,
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--config PATH] [--input PATH] [--output PATH] [--skip-header] [--summary] [--json] [--show | --no-show] [--verbose]",
        program
    )
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let program = args.first().map(String::as_str).unwrap_or("flomon_plot");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--config" | "--input" | "--output") => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a path\n{}", flag, usage(program)))?;
                let value = Some(PathBuf::from(value));
                match flag {
                    "--config" => parsed.config = value,
                    "--input" => parsed.input = value,
                    _ => parsed.output = value,
                }
                i += 2;
            }
            "--skip-header" => {
                parsed.skip_header = true;
                i += 1;
            }
            "--summary" => {
                parsed.summary = true;
                i += 1;
            }
            "--json" => {
                parsed.json = true;
                i += 1;
            }
            "--show" => {
                parsed.show = true;
                i += 1;
            }
            "--no-show" => {
                parsed.show = false;
                i += 1;
            }
            "--verbose" | "-v" => {
                parsed.verbose = true;
                i += 1;
            }
            "--help" | "-h" => {
                parsed.help = true;
                return Ok(parsed);
            }
            other => return Err(format!("Unknown argument: {}\n{}", other, usage(program))),
        }
    }

    Ok(parsed)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Opens `path` in the platform viewer and waits for the launcher to exit.
/// `open -W` and `start /WAIT` block until the viewer closes; `xdg-open`
/// usually returns as soon as it has handed the file off.
fn open_in_viewer(path: &Path) -> io::Result<ExitStatus> {
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = Command::new("open");
        c.arg("-W");
        c
    };
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "/WAIT", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(path).status()
}

/// Human-facing progress lines. Silent under `--json` so stdout carries
/// only the JSON document.
struct Status<W: Write> {
    out: W,
    quiet: bool,
}

impl<W: Write> Status<W> {
    fn new(out: W, args: &Args) -> Self {
        Status { out, quiet: args.json }
    }

    fn line(&mut self, msg: &str) {
        if !self.quiet {
            let _ = writeln!(self.out, "{}", msg);
        }
    }
}

/// Applies command-line overrides on top of the loaded configuration.
fn resolve_config(args: &Args, mut config: PlotConfig) -> PlotConfig {
    if let Some(input) = &args.input {
        config.input.path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if args.skip_header {
        config.input.header = HeaderMode::Skip;
    }
    config
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut status = Status::new(io::stdout(), &args);

    status.line("🌊 Bench Experiment Plotter");
    status.line("===========================\n");

    let config_path = args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let loaded = match &args.config {
        // An explicitly named config must exist
        Some(path) => load_config(path)?,
        None => load_config_or_default(&config_path)?,
    };
    let config = resolve_config(&args, loaded);
    debug!(config = %config_path.display(), "configuration resolved");

    status.line(&format!("📥 Reading {}...", config.input.path.display()));
    let outcome = read_experiment_file(&config.input.path, config.input.header)?;
    status.line(&format!(
        "✓ {} samples ({} rows skipped)\n",
        outcome.series.len(),
        outcome.rows_skipped
    ));

    if outcome.series.is_empty() {
        warn!(path = %config.input.path.display(), "no valid rows; charts will be empty");
    }

    status.line(&format!("📈 Rendering {}...", config.output.path.display()));
    render_to_file(&outcome.series, &config, &config.output.path)?;
    status.line("✓ Charts written\n");

    if args.summary || args.json {
        let summary = summarize(&outcome);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{}", format_summary(&summary));
        }
    }

    if args.show {
        status.line("🖼  Opening chart viewer...");
        match open_in_viewer(&config.output.path) {
            Ok(exit) if exit.success() => {}
            Ok(exit) => warn!(%exit, "viewer exited with failure"),
            Err(e) => warn!(error = %e, "could not launch chart viewer"),
        }
    }

    Ok(())
}

fn main() {
    let argv: Vec<String> = env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(1);
        }
    };

    if args.help {
        println!("{}", usage(argv.first().map(String::as_str).unwrap_or("flomon_plot")));
        return;
    }

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("\n❌ {}\n", e);
        std::process::exit(1);
    }
}

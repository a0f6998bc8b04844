/// Example: Parse an experiment log and print run statistics
///
/// Usage:
///   cargo run --example summarize_experiment -- <log_file> [--skip-header]
///
/// Demonstrates the ingest + summary modules without rendering:
///   - Rows accepted vs. skipped by the row filter
///   - Run duration and per-channel ranges
///   - Integrated volume through the flow sensor
///   - First and last few samples

use flomon_plot::analysis::summary::{format_summary, summarize};
use flomon_plot::ingest::experiment::{read_experiment_file, HeaderMode};
use std::env;

/// First positional argument; flags may come before or after it.
fn log_file_arg(args: &[String]) -> Option<&String> {
    args.iter().skip(1).find(|a| !a.starts_with("--"))
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let Some(filename) = log_file_arg(&args) else {
        eprintln!("Usage: {} <log_file> [--skip-header]", args[0]);
        eprintln!();
        eprintln!("Log lines look like:");
        eprintln!("  <elapsed_ms>,<distance_cm>,<flow_rate_Lmin>");
        std::process::exit(1);
    };

    let header = if args.iter().any(|a| a == "--skip-header") {
        HeaderMode::Skip
    } else {
        HeaderMode::Detect
    };

    let outcome = match read_experiment_file(filename, header) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("Parsed experiment log: {}\n", filename);
    print!("{}", format_summary(&summarize(&outcome)));

    if outcome.series.is_empty() {
        return;
    }

    println!("\n{:>12}  {:>12}  {:>12}", "t (ms)", "dist (cm)", "flow (L/min)");
    let n = outcome.series.len();
    for (i, reading) in outcome.series.iter().enumerate() {
        if i == 3 && n > 6 {
            println!("{:>12}", "...");
        }
        if i < 3 || i + 3 >= n {
            println!(
                "{:>12.1}  {:>12.2}  {:>12.2}",
                reading.elapsed_ms, reading.distance_cm, reading.flow_rate_lpm
            );
        }
    }
}

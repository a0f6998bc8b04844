/// Experiment summary statistics.
///
/// Condenses a parsed log into the numbers worth quoting in a lab notebook:
/// how long the run lasted, how far the level moved, and roughly how much
/// water passed the flow sensor. Statistics are taken over finite values
/// only, since the row filter lets `nan`/`inf` through.

use chrono::Duration;
use serde::Serialize;

use crate::model::{ParseOutcome, SensorSeries};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Descriptive statistics for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub first: f64,
    pub last: f64,
}

impl ChannelStats {
    /// Returns `None` if the channel has no finite values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut finite = values.iter().copied().filter(|v| v.is_finite());
        let first = finite.next()?;

        let mut min = first;
        let mut max = first;
        let mut sum = first;
        let mut count = 1usize;
        let mut last = first;
        for v in finite {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
            last = v;
        }

        Some(ChannelStats {
            min,
            max,
            mean: sum / count as f64,
            first,
            last,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentSummary {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_skipped: usize,
    /// Last elapsed time minus first; 0 with fewer than two samples
    pub duration_ms: f64,
    pub water_level: Option<ChannelStats>,
    pub flow_rate: Option<ChannelStats>,
    /// Last distance minus first (positive = surface moved away from sensor)
    pub water_level_change_cm: f64,
    /// Trapezoidal integral of flow rate over time
    pub total_volume_liters: f64,
    /// Intervals where elapsed time went backwards (logger restart)
    pub out_of_order_intervals: usize,
}

impl ExperimentSummary {
    /// Run length as a `chrono::Duration`; spans too large to represent
    /// read as zero.
    pub fn duration(&self) -> Duration {
        Duration::try_milliseconds(self.duration_ms.round() as i64).unwrap_or_else(Duration::zero)
    }
}

/// Summarizes a parsed log.
pub fn summarize(outcome: &ParseOutcome) -> ExperimentSummary {
    let series = &outcome.series;
    let water_level = ChannelStats::from_values(series.water_levels());
    let flow_rate = ChannelStats::from_values(series.flow_rates());
    let (total_volume_liters, out_of_order_intervals) = integrate_volume(series);

    ExperimentSummary {
        rows_read: outcome.rows_read,
        rows_accepted: series.len(),
        rows_skipped: outcome.rows_skipped,
        duration_ms: span(series.times()),
        water_level,
        flow_rate,
        water_level_change_cm: water_level.map(|s| s.last - s.first).unwrap_or(0.0),
        total_volume_liters,
        out_of_order_intervals,
    }
}

fn span(times: &[f64]) -> f64 {
    match (times.first(), times.last()) {
        (Some(first), Some(last)) if times.len() >= 2 && first.is_finite() && last.is_finite() => {
            last - first
        }
        _ => 0.0,
    }
}

/// Integrates L/min over ms. Intervals with a negative time step or a
/// non-finite endpoint contribute nothing; negative steps are counted.
fn integrate_volume(series: &SensorSeries) -> (f64, usize) {
    let times = series.times();
    let flows = series.flow_rates();

    let mut liters = 0.0;
    let mut out_of_order = 0;
    for i in 1..series.len() {
        let dt_ms = times[i] - times[i - 1];
        if dt_ms < 0.0 {
            out_of_order += 1;
            continue;
        }
        let avg_lpm = (flows[i] + flows[i - 1]) / 2.0;
        let step = avg_lpm * dt_ms / MS_PER_MINUTE;
        if step.is_finite() {
            liters += step;
        }
    }

    (liters, out_of_order)
}

/// Formats a duration as `HH:MM:SS.mmm`.
pub fn format_elapsed(duration: Duration) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let total_ms = duration.num_milliseconds().unsigned_abs();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;
    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
}

/// Multi-line human-readable report.
pub fn format_summary(summary: &ExperimentSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Rows: {} read, {} accepted, {} skipped\n",
        summary.rows_read, summary.rows_accepted, summary.rows_skipped
    ));
    out.push_str(&format!("Duration: {}\n", format_elapsed(summary.duration())));

    match &summary.water_level {
        Some(s) => out.push_str(&format!(
            "Distance (cm): min {:.2}, max {:.2}, mean {:.2}, change {:+.2}\n",
            s.min, s.max, s.mean, summary.water_level_change_cm
        )),
        None => out.push_str("Distance (cm): no data\n"),
    }
    match &summary.flow_rate {
        Some(s) => out.push_str(&format!(
            "Flow rate (L/min): min {:.2}, max {:.2}, mean {:.2}\n",
            s.min, s.max, s.mean
        )),
        None => out.push_str("Flow rate (L/min): no data\n"),
    }
    out.push_str(&format!("Volume passed: {:.3} L\n", summary.total_volume_liters));

    if summary.out_of_order_intervals > 0 {
        out.push_str(&format!(
            "Warning: elapsed time went backwards {} time(s)\n",
            summary.out_of_order_intervals
        ));
    }
    out
}

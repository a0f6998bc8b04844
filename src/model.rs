/// Shared data types for experiment logs.
///
/// A logged experiment is three parallel channels sampled together: elapsed
/// time (ms), ultrasonic water-level distance (cm), and flow rate (L/min).
/// `SensorSeries` keeps them index-aligned by only accepting whole readings.

use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// One accepted row of an experiment log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorReading {
    pub elapsed_ms: f64,
    pub distance_cm: f64,
    pub flow_rate_lpm: f64,
}

/// Three equal-length, row-aligned sequences built from accepted readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorSeries {
    times: Vec<f64>,
    water_levels: Vec<f64>,
    flow_rates: Vec<f64>,
}

impl SensorSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value to each channel.
    pub fn push(&mut self, reading: SensorReading) {
        self.times.push(reading.elapsed_ms);
        self.water_levels.push(reading.distance_cm);
        self.flow_rates.push(reading.flow_rate_lpm);
    }

    /// Elapsed time since measurement start, in milliseconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Ultrasonic distance readings, in centimeters.
    pub fn water_levels(&self) -> &[f64] {
        &self.water_levels
    }

    /// Flow sensor readings, in liters per minute.
    pub fn flow_rates(&self) -> &[f64] {
        &self.flow_rates
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Re-assembles row `index` from the three channels.
    pub fn get(&self, index: usize) -> Option<SensorReading> {
        Some(SensorReading {
            elapsed_ms: *self.times.get(index)?,
            distance_cm: *self.water_levels.get(index)?,
            flow_rate_lpm: *self.flow_rates.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SensorReading> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

impl FromIterator<SensorReading> for SensorSeries {
    fn from_iter<I: IntoIterator<Item = SensorReading>>(iter: I) -> Self {
        let mut series = SensorSeries::new();
        for reading in iter {
            series.push(reading);
        }
        series
    }
}

/// Result of reading a whole experiment log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub series: SensorSeries,
    /// Records seen in the file, including a skipped header.
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Failure to read an experiment log as a whole. Individual malformed rows
/// are never errors; they are dropped by the row filter.
#[derive(Debug)]
pub enum IngestError {
    /// The input file could not be opened (usually missing)
    Open { path: PathBuf, source: io::Error },
    /// I/O failure while streaming records
    Read(io::Error),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Open { path, source } => {
                write!(f, "Failed to open experiment log {}: {}", path.display(), source)
            }
            IngestError::Read(e) => write!(f, "Failed to read experiment log: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Open { source, .. } => Some(source),
            IngestError::Read(e) => Some(e),
        }
    }
}

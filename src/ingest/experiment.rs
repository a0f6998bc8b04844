/// Experiment log parser.
///
/// The bench logger writes one comma-separated line per sample:
///
/// ```text
/// <elapsed_ms>,<distance_cm>,<flow_rate_Lmin>
/// ```
///
/// A line is kept only if it has exactly three fields and all three parse as
/// floats. Anything else (a header, a truncated write, a stray debug print
/// from the microcontroller) is dropped without error. See `fixtures.rs` for
/// representative logs.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::model::{IngestError, ParseOutcome, SensorReading, SensorSeries};

/// Default log file name written by the bench logger.
pub const DEFAULT_INPUT_FILE: &str = "Experiment_values.txt";

/// How the first record of a log is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// First record goes through the row filter like any other. A text
    /// header is dropped because it does not parse; a numeric one is data.
    #[default]
    Detect,
    /// First record is always discarded.
    Skip,
}

// ---------------------------------------------------------------------------
// Row filter
// ---------------------------------------------------------------------------

/// Converts one record into a reading, or `None` if it has the wrong number
/// of fields or any field is not a float.
pub fn parse_row(record: &StringRecord) -> Option<SensorReading> {
    if record.len() != 3 {
        return None;
    }

    Some(SensorReading {
        elapsed_ms: parse_field(&record[0])?,
        distance_cm: parse_field(&record[1])?,
        flow_rate_lpm: parse_field(&record[2])?,
    })
}

fn parse_field(field: &str) -> Option<f64> {
    let field = field.trim();
    if !field.contains('_') {
        return field.parse::<f64>().ok();
    }
    strip_digit_separators(field)?.parse::<f64>().ok()
}

/// Removes `_` digit separators (`1_000.5`). Each underscore must sit
/// between two ASCII digits; anything else rejects the field.
fn strip_digit_separators(field: &str) -> Option<String> {
    let bytes = field.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        match (before, after) {
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(field.replace('_', ""))
}

// ---------------------------------------------------------------------------
// Whole-log parsing
// ---------------------------------------------------------------------------

/// Streams every record from `reader` through the row filter.
///
/// # Errors
/// - `IngestError::Read` — the underlying reader failed mid-stream.
///
/// Records that are not valid UTF-8 count as malformed rows and are dropped.
pub fn parse_experiment<R: Read>(reader: R, header: HeaderMode) -> Result<ParseOutcome, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut outcome = ParseOutcome::default();
    let mut record = StringRecord::new();

    loop {
        let more = match csv_reader.read_record(&mut record) {
            Ok(more) => more,
            Err(e) => match e.into_kind() {
                csv::ErrorKind::Io(io_err) => return Err(IngestError::Read(io_err)),
                _ => {
                    outcome.rows_read += 1;
                    outcome.rows_skipped += 1;
                    continue;
                }
            },
        };
        if !more {
            break;
        }

        outcome.rows_read += 1;

        if header == HeaderMode::Skip && outcome.rows_read == 1 {
            outcome.rows_skipped += 1;
            continue;
        }

        match parse_row(&record) {
            Some(reading) => outcome.series.push(reading),
            None => outcome.rows_skipped += 1,
        }
    }

    Ok(outcome)
}

/// Parses an in-memory log. Reading from a string cannot fail.
pub fn parse_experiment_str(text: &str, header: HeaderMode) -> SensorSeries {
    parse_experiment(text.as_bytes(), header)
        .map(|outcome| outcome.series)
        .unwrap_or_default()
}

/// Opens `path`, consumes it fully, and closes it before returning.
///
/// # Errors
/// - `IngestError::Open` — the file does not exist or is not readable.
/// - `IngestError::Read` — I/O failure while reading.
pub fn read_experiment_file<P: AsRef<Path>>(path: P, header: HeaderMode) -> Result<ParseOutcome, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let outcome = parse_experiment(file, header)?;

    debug!(
        path = %path.display(),
        rows_read = outcome.rows_read,
        accepted = outcome.series.len(),
        skipped = outcome.rows_skipped,
        "parsed experiment log"
    );

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Test fixtures: representative experiment logs from the bench logger.
///
/// The logger prints `elapsed_ms,distance_cm,flow_rate_Lmin` once per sample
/// over serial, and the host captures the stream to `Experiment_values.txt`.
/// Real captures often begin with a header line and pick up boot chatter or
/// partial lines when the port is opened mid-write, so the fixtures below
/// cover those shapes.

/// The three-row example: one good row, one two-field row, one good row.
#[cfg(test)]
pub(crate) fn fixture_mixed_rows() -> &'static str {
    "0,10.5,2.1\nbad,row\n10,10.2,2.0\n"
}

/// Five clean samples at 250 ms spacing, tank draining while the pump ramps up.
#[cfg(test)]
pub(crate) fn fixture_clean_log() -> &'static str {
    "0,30.2,0.0
250,29.8,1.2
500,29.1,2.4
750,28.5,2.5
1000,27.9,2.5
"
}

/// Capture that starts with the logger's text header.
#[cfg(test)]
pub(crate) fn fixture_with_header() -> &'static str {
    "Elapsed Time (ms),Distance (cm),Flow Rate (L/min)
0,12.0,0.0
100,11.8,0.9
200,11.5,1.1
"
}

/// A first line that happens to be numeric. Under header detection it is
/// indistinguishable from data.
#[cfg(test)]
pub(crate) fn fixture_numeric_header() -> &'static str {
    "1,2,3
0,15.0,0.5
100,14.7,0.6
"
}

/// Good rows interleaved with a short row, a long row, and a trailing comma.
#[cfg(test)]
pub(crate) fn fixture_bad_field_counts() -> &'static str {
    "0,20.0,1.0
5,19.9
20,19.8,1.1
10,19.9,1.0,extra
40,19.5,1.2
30,19.6,1.1,
"
}

/// Serial capture with boot chatter, a torn line, and a sensor timeout marker.
#[cfg(test)]
pub(crate) fn fixture_noisy_serial_log() -> &'static str {
    "ets Jun  8 2016 00:22:57
rst:0x1 (POWERON_RESET),boot:0x13 (SPI_FAST_FLASH_BOOT)
Elapsed Time (ms),Distance (cm),Flow Rate (L/min)
0,25.40,0.00
500,25.10,1.50
750,24.9
1000,24.85,1.75
1250,TIMEOUT,1.80
"
}

/// Samples with a clock reset partway through (logger restarted without
/// the capture being cut).
#[cfg(test)]
pub(crate) fn fixture_clock_reset() -> &'static str {
    "0,10.0,1.0
60000,9.0,1.0
0,9.0,2.0
60000,8.0,2.0
"
}

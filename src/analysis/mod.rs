/// Post-parse analysis of experiment logs.
///
/// Submodules:
/// - `summary` — run duration, per-channel statistics, integrated volume.

pub mod summary;

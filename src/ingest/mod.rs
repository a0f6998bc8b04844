/// Input parsing for bench experiment logs.
///
/// - `experiment` — CSV row filter and file reader
/// - `fixtures` (test only) — representative serial captures

pub mod experiment;
pub mod fixtures;

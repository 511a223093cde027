use chrono::{DateTime, Local};
use std::time::Instant;

/// The current local time, formatted the way job/action timestamps are
/// stored: `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn current_datetime() -> String {
    human_datetime(&Local::now())
}

/// Format a timestamp in the storage format used throughout the job and
/// action tables.
#[must_use]
pub fn human_datetime(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A compact, whitespace-free timestamp suitable for use inside a job
/// label: `YYYYMMDDHHMMSS`.
#[must_use]
pub fn compact_timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Seconds elapsed since `start`, formatted to three decimal places.
#[must_use]
pub fn runtime_since(start: Instant) -> String {
    format!("{:.3}", start.elapsed().as_secs_f64())
}

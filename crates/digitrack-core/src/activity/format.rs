use std::time::Duration;

use chrono::{DateTime, Local};

/// Timestamp layout used in session records and API responses.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a duration in seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated. Hours are not wrapped at 24, so a
/// 25 hour session renders as `25:00:00`. Negative or non-finite input
/// renders as `00:00:00`.
pub fn format_hms(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Format a local timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Wall-clock time from `from` to `to`, clamped to zero when the clock
/// stepped backwards.
pub(crate) fn elapsed_between(from: DateTime<Local>, to: DateTime<Local>) -> Duration {
    (to - from).to_std().unwrap_or(Duration::ZERO)
}

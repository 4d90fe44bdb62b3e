use chrono::{TimeZone, Utc};

/// Returns the current Unix timestamp in milliseconds.
pub fn current_unix_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}

/// Returns the current Unix timestamp in seconds.
pub fn current_unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Formats a Unix timestamp (seconds) as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_unix_timestamp(unix_secs: u64) -> String {
    let timestamp = i64::try_from(unix_secs).unwrap_or(i64::MAX);
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// Formats a Unix timestamp (seconds) as a compact `HHMMSS` wall-clock label.
pub fn format_unix_time_compact(unix_secs: u64) -> String {
    let timestamp = i64::try_from(unix_secs).unwrap_or(i64::MAX);
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.format("%H%M%S").to_string(),
        None => String::new(),
    }
}

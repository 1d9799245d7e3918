//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in JST (milliseconds)
    fn now_jst_millis(&self) -> i64;

    /// Get current time as a fixed-width RFC 3339 string in JST
    fn now_rfc3339(&self) -> String {
        timestamp_to_jst_rfc3339(self.now_jst_millis())
    }
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_jst_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_jst_millis(&self) -> i64 {
        self.fixed_time
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap() // JST is UTC+9
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    chrono::Utc::now().with_timezone(&jst()).timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to JST RFC 3339 format
///
/// The output always carries millisecond precision
/// (`2023-01-01T00:00:00.000+09:00`), so strings sort in time order.
/// Out-of-range timestamps yield an empty string.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_millis)
        .map(|dt| {
            dt.with_timezone(&jst())
                .to_rfc3339_opts(SecondsFormat::Millis, false)
        })
        .unwrap_or_default()
}

/// Parse an RFC 3339 string into JST wall-clock time (`HH:MM:SS`)
pub fn rfc3339_to_jst_clock(rfc3339: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(rfc3339)
        .ok()
        .map(|dt| dt.with_timezone(&jst()).format("%H:%M:%S").to_string())
}

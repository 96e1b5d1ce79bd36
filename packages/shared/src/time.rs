//! Time-related utilities with clock abstraction for testability.
//!
//! All user-visible timestamps in Serambi are Western Indonesia Time
//! (WIB, UTC+7), carried internally as Unix milliseconds.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in WIB (milliseconds)
    fn now_wib_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_wib_millis(&self) -> i64 {
        get_wib_timestamp()
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
    fn now_wib_millis(&self) -> i64 {
        self.fixed_time
    }
}

fn wib_offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("WIB offset is in range") // WIB is UTC+7
}

/// Get current Unix timestamp in WIB (milliseconds)
pub fn get_wib_timestamp() -> i64 {
    let now_utc = Utc::now();
    let now_wib: DateTime<FixedOffset> = now_utc.with_timezone(&wib_offset());
    now_wib.timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to a `YYYY-MM-DD HH:MM:SS` WIB string
///
/// This is the format used in room listings.
pub fn timestamp_to_wib_datetime(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis / 1000;
    let nanos = ((timestamp_millis % 1000) * 1_000_000) as u32;
    match wib_offset().timestamp_opt(seconds, nanos) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => "invalid timestamp".to_string(),
    }
}

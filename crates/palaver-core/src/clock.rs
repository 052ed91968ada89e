//! Wall-clock helpers. All persisted and wire timestamps are Unix
//! milliseconds; only the store TTL is in seconds.

use jiff::Timestamp;

/// Current time in Unix milliseconds.
pub fn now_millis() -> i64 {
    Timestamp::now().as_millisecond()
}

/// Current time in Unix seconds.
pub fn now_seconds() -> i64 {
    Timestamp::now().as_second()
}

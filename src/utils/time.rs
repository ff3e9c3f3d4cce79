//! Wall-clock helpers

/// Current Unix time in milliseconds
#[inline]
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

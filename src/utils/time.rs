use chrono::Utc;

/// Milliseconds since the Unix epoch, the unit photo timestamps are stored in.
pub fn now_ms() -> i64 {
	Utc::now().timestamp_millis()
}

pub const FIVE_MINUTES_MS: i64 = 5 * 60 * 1000;

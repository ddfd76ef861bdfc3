use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Milliseconds since the Unix epoch (UTC)
pub type Timestamp = i64;

// Timestamps without an offset (the backend emits these for naive columns)
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO 8601 timestamp into epoch milliseconds
///
/// Offsets are honoured. Timestamps without an offset are read as UTC and a
/// bare date is midnight UTC. Blank or unparsable input yields `None`.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Format a timestamp as RFC 3339 with millisecond precision (`...T12:00:00.000Z`)
#[must_use]
pub fn format_iso(time: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(time)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Format a timestamp as a `HH:MM:SS` clock label
#[must_use]
pub fn format_clock(time: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(time)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Current wall-clock time
#[must_use]
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

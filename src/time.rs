use chrono::{SecondsFormat, Utc};

/// The current time as an ISO-8601 string, e.g. `2024-05-01T12:00:00.000Z`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

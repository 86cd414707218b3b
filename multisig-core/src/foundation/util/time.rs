use chrono::{SecondsFormat, Utc};

/// Key event timestamp, e.g. `2024-05-01T10:11:12.123456+00:00`.
pub fn create_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

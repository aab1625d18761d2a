pub mod application;
pub mod history;
pub mod job;
pub mod settings;
pub mod user;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Backend timestamps are naive ISO-8601 (`2025-03-01T10:22:05.123456`), but
/// offset-qualified values are accepted too and converted to UTC.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.naive_utc())
}

//! @ai:module:intent Lenient parsing of record timestamps
//! @ai:module:layer domain
//! @ai:module:public_api parse_instant, format_instant
//! @ai:module:stateless true

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Offset-less layouts, read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// @ai:intent Parse a timestamp field value into a UTC instant
/// @ai:post returns None for empty, non-string/non-number, or unparseable values
/// @ai:effects pure
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_instant_str(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// @ai:intent Parse a timestamp string in RFC 3339, naive date-time, or date form
/// @ai:effects pure
fn parse_instant_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// @ai:intent Format an instant the way records store it (millisecond precision, Z suffix)
/// @ai:effects pure
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

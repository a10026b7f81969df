//! @ai:module:intent Schema-tolerant record value shared by issues and billing corrections
//! @ai:module:layer domain
//! @ai:module:public_api Record, STATUS_RESOLVED, CREATED_AT_ALIASES, RESOLVED_AT_ALIASES
//! @ai:module:stateless true

use crate::records::timestamp::{format_instant, parse_instant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_RESOLVED: &str = "Resolved";
pub const STATUS_OPEN: &str = "Open";

/// Field names the creation instant has been stored under, in lookup order.
pub const CREATED_AT_ALIASES: [&str; 3] = ["createdAt", "createAt", "createTime"];

/// Field names the resolution instant has been stored under, in lookup order.
pub const RESOLVED_AT_ALIASES: [&str; 2] = ["resolveTime", "resolutionTime"];

/// @ai:intent One row from the Issues or Billing sheet
/// @ai:invariant every field received from the store survives a fetch/update round trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// @ai:intent Create an empty record
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Wrap a JSON object as a record
    /// @ai:effects pure
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// @ai:intent Convert a JSON value into a record if it is an object
    /// @ai:effects pure
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// @ai:intent Builder-style field setter
    /// @ai:effects pure
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// @ai:intent Read a field as display text
    /// @ai:post numbers and booleans are rendered, null and missing fields are None
    /// @ai:effects pure
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// @ai:intent Read a field as text, empty string when absent
    /// @ai:effects pure
    pub fn text_or_empty(&self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }

    /// @ai:intent True when status is exactly "Resolved"
    /// @ai:effects pure
    pub fn is_resolved(&self) -> bool {
        self.status() == Some(STATUS_RESOLVED)
    }

    /// @ai:intent Status reads "resolved" in any letter case
    /// @ai:effects pure
    pub fn is_resolved_ignoring_case(&self) -> bool {
        self.status()
            .is_some_and(|s| s.eq_ignore_ascii_case(STATUS_RESOLVED))
    }

    /// @ai:intent Raw creation timestamp value from the first populated alias
    /// @ai:effects pure
    pub fn created_at_raw(&self) -> Option<&Value> {
        self.first_populated(&CREATED_AT_ALIASES)
    }

    /// @ai:intent Raw resolution timestamp value from the first populated alias
    /// @ai:effects pure
    pub fn resolved_at_raw(&self) -> Option<&Value> {
        self.first_populated(&RESOLVED_AT_ALIASES)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at_raw().and_then(parse_instant)
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at_raw().and_then(parse_instant)
    }

    /// @ai:intent Transition the record to Resolved and stamp the resolution time
    /// @ai:post is_resolved() and resolveTime == now
    /// @ai:effects state:write
    pub fn mark_resolved(&mut self, now: DateTime<Utc>) {
        self.set("status", STATUS_RESOLVED);
        self.set("resolveTime", format_instant(now));
    }

    /// An alias counts as populated when it holds anything other than null or "".
    fn first_populated(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                _ => true,
            })
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_is_resolved_exact_match_only() {
        assert!(Record::new().with("status", "Resolved").is_resolved());
        assert!(!Record::new().with("status", "resolved").is_resolved());
        assert!(!Record::new().with("status", "Open").is_resolved());
        assert!(!Record::new().is_resolved());
    }

    #[test]
    fn test_is_resolved_ignoring_case() {
        assert!(Record::new().with("status", "resolved").is_resolved_ignoring_case());
        assert!(Record::new().with("status", "RESOLVED").is_resolved_ignoring_case());
        assert!(!Record::new().with("status", "Pending").is_resolved_ignoring_case());
        assert!(!Record::new().is_resolved_ignoring_case());
    }

    #[test]
    fn test_created_at_alias_precedence() {
        let record = Record::new()
            .with("createTime", "2025-01-01T03:00:00Z")
            .with("createAt", "2025-01-01T02:00:00Z");
        assert_eq!(
            record.created_at(),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap())
        );

        let record = record.with("createdAt", "2025-01-01T01:00:00Z");
        assert_eq!(
            record.created_at(),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_alias_falls_through() {
        let record = Record::new()
            .with("resolveTime", "")
            .with("resolutionTime", "2025-01-01T00:10:00Z");
        assert_eq!(record.resolved_at_raw(), Some(&json!("2025-01-01T00:10:00Z")));
    }

    #[test]
    fn test_mark_resolved_stamps_fields() {
        let mut record = Record::new().with("status", "Open").with("title", "Printer down");
        let now = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();

        record.mark_resolved(now);

        assert!(record.is_resolved());
        assert_eq!(record.text("resolveTime").as_deref(), Some("2025-02-03T04:05:06.000Z"));
        assert_eq!(record.text("title").as_deref(), Some("Printer down"));
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = json!({"status": "Open", "reporter": "ana", "amount": 12.5, "tags": ["a"]});
        let record: Record = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_text_renders_numbers() {
        let record = Record::new().with("discountAmount", 250);
        assert_eq!(record.text("discountAmount").as_deref(), Some("250"));
        assert_eq!(record.text_or_empty("missing"), "");
    }
}

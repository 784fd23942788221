//! Measurement record representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single air-quality reading as returned by the measurements endpoint.
///
/// The record is kept opaque: only the fields needed for keying are ever
/// inspected, and everything else is carried through untouched so that the
/// published message matches what the upstream API served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementRecord(Value);

impl MeasurementRecord {
    /// Wraps a raw JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns a top-level string field, if present.
    ///
    /// `null` and non-string values count as absent.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns the UTC timestamp string from the nested `date` object.
    #[must_use]
    pub fn utc_timestamp(&self) -> Option<&str> {
        self.0
            .get("date")
            .and_then(|date| date.get("utc"))
            .and_then(Value::as_str)
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the record, returning the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Serializes the record as compact JSON (no insignificant whitespace).
    #[must_use]
    pub fn to_compact_json(&self) -> String {
        // Display on Value is infallible and emits the compact form.
        self.0.to_string()
    }
}

impl From<Value> for MeasurementRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MeasurementRecord {
        MeasurementRecord::new(json!({
            "location": "Reseda",
            "city": "Los Angeles-Long Beach-Santa Ana",
            "country": "US",
            "parameter": "pm25",
            "value": 7.5,
            "unit": "µg/m³",
            "date": { "utc": "2020-05-01T00:00:00.000Z", "local": "2020-04-30T17:00:00-07:00" }
        }))
    }

    #[test]
    fn test_field_access() {
        let record = sample();
        assert_eq!(record.field("location"), Some("Reseda"));
        assert_eq!(record.field("value"), None);
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_utc_timestamp() {
        assert_eq!(sample().utc_timestamp(), Some("2020-05-01T00:00:00.000Z"));

        let no_date = MeasurementRecord::new(json!({ "location": "x" }));
        assert_eq!(no_date.utc_timestamp(), None);
    }

    #[test]
    fn test_compact_json_has_no_whitespace() {
        let record = MeasurementRecord::new(json!({ "a": 1, "b": [1, 2] }));
        assert_eq!(record.to_compact_json(), r#"{"a":1,"b":[1,2]}"#);
    }

    #[test]
    fn test_transparent_serde() {
        let record = sample();
        let text = serde_json::to_string(&record).unwrap();
        let back: MeasurementRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert!(text.starts_with('{'));
    }
}

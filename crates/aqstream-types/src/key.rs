//! Composite record identity.

use serde::{Deserialize, Serialize};

use crate::{IncompleteRecordError, MeasurementRecord};

/// Separator placed between the components of a [`RecordKey`].
pub const KEY_DELIMITER: char = ';';

/// Top-level fields that make up a record key, in key order.
///
/// The UTC timestamp (`date.utc`) is appended after these.
pub const KEY_FIELDS: [&str; 4] = ["location", "city", "country", "parameter"];

/// Composite key identifying one logical measurement.
///
/// Two records with equal keys are the same measurement; the later one wins.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the record key from location, city, country, parameter and the
/// UTC timestamp.
///
/// # Errors
///
/// Returns [`IncompleteRecordError`] naming the first field that is absent,
/// `null`, or not a string.
pub fn key_of(record: &MeasurementRecord) -> Result<RecordKey, IncompleteRecordError> {
    let mut key = String::new();

    for field in KEY_FIELDS {
        let part = record
            .field(field)
            .ok_or(IncompleteRecordError { field })?;
        key.push_str(part);
        key.push(KEY_DELIMITER);
    }

    let utc = record
        .utc_timestamp()
        .ok_or(IncompleteRecordError { field: "date.utc" })?;
    key.push_str(utc);

    Ok(RecordKey(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: f64) -> MeasurementRecord {
        MeasurementRecord::new(json!({
            "location": "Reseda",
            "city": "Los Angeles",
            "country": "US",
            "parameter": "o3",
            "value": value,
            "date": { "utc": "2020-05-01T10:00:00.000Z" }
        }))
    }

    #[test]
    fn test_key_layout() {
        let key = key_of(&record(0.03)).unwrap();
        assert_eq!(
            key.as_str(),
            "Reseda;Los Angeles;US;o3;2020-05-01T10:00:00.000Z"
        );
    }

    #[test]
    fn test_value_does_not_affect_key() {
        assert_eq!(key_of(&record(0.03)), key_of(&record(0.09)));
    }

    #[test]
    fn test_missing_top_level_field() {
        let record = MeasurementRecord::new(json!({
            "location": "Reseda",
            "country": "US",
            "parameter": "o3",
            "date": { "utc": "2020-05-01T10:00:00.000Z" }
        }));
        assert_eq!(key_of(&record), Err(IncompleteRecordError { field: "city" }));
    }

    #[test]
    fn test_null_field_is_incomplete() {
        let record = MeasurementRecord::new(json!({
            "location": "Reseda",
            "city": null,
            "country": "US",
            "parameter": "o3",
            "date": { "utc": "2020-05-01T10:00:00.000Z" }
        }));
        assert!(key_of(&record).is_err());
    }

    #[test]
    fn test_missing_timestamp() {
        let record = MeasurementRecord::new(json!({
            "location": "Reseda",
            "city": "Los Angeles",
            "country": "US",
            "parameter": "o3",
            "date": { "local": "2020-05-01T03:00:00-07:00" }
        }));
        let err = key_of(&record).unwrap_err();
        assert_eq!(err.field, "date.utc");
    }
}

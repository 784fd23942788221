//! Record deduplication.

use aqstream_types::{MeasurementRecord, RecordKey, key_of};
use std::collections::BTreeMap;

/// Records folded to one entry per [`RecordKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deduped {
    /// Surviving records, ordered by key.
    pub entries: BTreeMap<RecordKey, MeasurementRecord>,
    /// Records dropped because a keying field was missing.
    pub dropped: usize,
}

impl Deduped {
    /// Returns the surviving records in key order.
    #[must_use]
    pub fn into_records(self) -> Vec<MeasurementRecord> {
        self.entries.into_values().collect()
    }

    /// Returns the number of surviving records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no record survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Folds `records` into a keyed map.
///
/// When two records share a key the one later in input order wins.
/// Records without a complete key are dropped and counted.
pub fn dedup_records<I>(records: I) -> Deduped
where
    I: IntoIterator<Item = MeasurementRecord>,
{
    let mut deduped = Deduped::default();

    for record in records {
        match key_of(&record) {
            Ok(key) => {
                deduped.entries.insert(key, record);
            }
            Err(e) => {
                log::debug!("dropping record: {e}");
                deduped.dropped += 1;
            }
        }
    }

    if deduped.dropped > 0 {
        log::warn!(
            "dropped {} records with incomplete keys",
            deduped.dropped
        );
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(location: &str, utc: &str, value: f64) -> MeasurementRecord {
        MeasurementRecord::new(json!({
            "location": location,
            "city": "Phoenix",
            "country": "US",
            "parameter": "pm10",
            "value": value,
            "date": { "utc": utc }
        }))
    }

    #[test]
    fn test_later_duplicate_wins() {
        let deduped = dedup_records(vec![
            reading("Durango", "2020-05-01T01:00:00Z", 11.0),
            reading("Durango", "2020-05-01T01:00:00Z", 12.0),
        ]);

        assert_eq!(deduped.len(), 1);
        let records = deduped.into_records();
        assert_eq!(records[0].as_value()["value"], json!(12.0));
    }

    #[test]
    fn test_distinct_keys_survive() {
        let deduped = dedup_records(vec![
            reading("Durango", "2020-05-01T01:00:00Z", 11.0),
            reading("Durango", "2020-05-01T02:00:00Z", 11.0),
            reading("Glendale", "2020-05-01T01:00:00Z", 11.0),
        ]);

        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped.dropped, 0);
    }

    #[test]
    fn test_incomplete_records_are_counted() {
        let deduped = dedup_records(vec![
            reading("Durango", "2020-05-01T01:00:00Z", 11.0),
            MeasurementRecord::new(json!({ "location": "Nowhere", "value": 1 })),
            MeasurementRecord::new(json!(null)),
        ]);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped.dropped, 2);
    }

    #[test]
    fn test_empty_input() {
        let deduped = dedup_records(Vec::new());
        assert!(deduped.is_empty());
        assert_eq!(deduped.dropped, 0);
    }
}

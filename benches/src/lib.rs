//! Benchmark utilities for aqstream.

use aqstream_lib::MeasurementRecord;
use chrono::NaiveDate;
use serde_json::json;

const PARAMETERS: [&str; 4] = ["pm25", "pm10", "o3", "no2"];

/// Shape of a synthetic day of measurements.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticDay {
    /// Day the readings belong to.
    pub date: NaiveDate,
    /// Number of records to generate.
    pub records: usize,
    /// Every `duplicate_every`-th record repeats the key of the one before it.
    /// Zero disables duplicates.
    pub duplicate_every: usize,
}

impl SyntheticDay {
    /// A day of `records` readings with no duplicate keys.
    #[must_use]
    pub const fn unique(date: NaiveDate, records: usize) -> Self {
        Self {
            date,
            records,
            duplicate_every: 0,
        }
    }

    /// Generates the records, shaped like an upstream page entry.
    #[must_use]
    pub fn generate(&self) -> Vec<MeasurementRecord> {
        let mut out = Vec::with_capacity(self.records);
        let mut slot = 0usize;

        for i in 0..self.records {
            if self.duplicate_every == 0 || i == 0 || i % self.duplicate_every != 0 {
                slot += 1;
            }
            let station = slot / (PARAMETERS.len() * 24);
            let parameter = PARAMETERS[slot % PARAMETERS.len()];
            let hour = (slot / PARAMETERS.len()) % 24;

            out.push(MeasurementRecord::new(json!({
                "location": format!("Station {station}"),
                "city": format!("City {}", station % 50),
                "country": "US",
                "parameter": parameter,
                "value": i as f64 * 0.1,
                "unit": "µg/m³",
                "date": {
                    "utc": format!("{}T{hour:02}:00:00.000Z", self.date.format("%Y-%m-%d")),
                    "local": format!("{}T{hour:02}:00:00-07:00", self.date.format("%Y-%m-%d")),
                },
                "coordinates": { "latitude": 43.6, "longitude": -116.2 },
            })));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqstream_lib::dedup_records;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()
    }

    #[test]
    fn test_unique_day_has_distinct_keys() {
        let deduped = dedup_records(SyntheticDay::unique(day(), 500).generate());
        assert_eq!(deduped.len(), 500);
        assert_eq!(deduped.dropped, 0);
    }

    #[test]
    fn test_duplicates_collapse() {
        let day = SyntheticDay {
            date: day(),
            records: 1_000,
            duplicate_every: 10,
        };
        assert_eq!(dedup_records(day.generate()).len(), 901);
    }
}

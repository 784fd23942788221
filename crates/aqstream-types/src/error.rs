//! Error types for aqstream.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for aqstream operations.
pub type Result<T> = std::result::Result<T, AqError>;

/// Errors that can surface from any stage of the pipeline.
///
/// Library crates keep their own narrower error enums; this type is what
/// they collapse into at the facade boundary.
#[derive(Error, Debug)]
pub enum AqError {
    /// Upstream fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Date cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Message sink rejected or failed to deliver a record.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}

/// A record lacks one of the fields the record key is built from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Record is missing keying field `{field}`")]
pub struct IncompleteRecordError {
    /// Name of the first missing field (`date.utc` for the timestamp).
    pub field: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_error_passes_through() {
        let start = NaiveDate::from_ymd_opt(2020, 5, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let error = AqError::from(DateRangeError::InvalidRange { start, end });

        assert!(matches!(error, AqError::DateRange(_)));
        assert_eq!(error.to_string(), "Invalid date range: 2020-05-02 > 2020-05-01");
    }
}

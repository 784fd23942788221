//! OpenAQ measurements endpoint and query construction.

use chrono::NaiveDate;

/// Measurements endpoint of the OpenAQ v1 API.
pub const ENDPOINT: &str = "https://api.openaq.org/v1/measurements";

/// Largest page the server will return (server-side limit).
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Country filter applied to every request.
pub const COUNTRY: &str = "US";

/// Only request records that carry coordinates.
pub const HAS_GEO: bool = true;

/// Builds the query parameters for one page of a day's measurements.
///
/// `date_from` and `date_to` are both set to `date`; `page` is 1-based.
///
/// # Example
///
/// ```
/// use aqstream_fetch::url::measurement_query;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
/// let query = measurement_query(date, 2, 10_000);
/// assert!(query.contains(&("date_from", "2020-05-01".to_string())));
/// assert!(query.contains(&("page", "2".to_string())));
/// ```
#[must_use]
pub fn measurement_query(date: NaiveDate, page: u32, limit: u32) -> Vec<(&'static str, String)> {
    let day = date.format("%Y-%m-%d").to_string();
    vec![
        ("country", COUNTRY.to_string()),
        ("has_geo", HAS_GEO.to_string()),
        ("date_from", day.clone()),
        ("date_to", day),
        ("limit", limit.to_string()),
        ("page", page.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parameters() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 9).unwrap();
        let query = measurement_query(date, 1, 500);

        assert_eq!(
            query,
            vec![
                ("country", "US".to_string()),
                ("has_geo", "true".to_string()),
                ("date_from", "2020-01-09".to_string()),
                ("date_to", "2020-01-09".to_string()),
                ("limit", "500".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }
}

//! Pagination over a day's result set.

use aqstream_types::MeasurementRecord;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{FetchError, Page};

/// A source of measurement pages.
///
/// Implemented by [`crate::FetchClient`]; the pagination driver only talks
/// to this trait.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Records requested per page.
    fn page_size(&self) -> u32;

    /// Fetches the 1-based `page` of measurements for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the page could not be retrieved or decoded.
    async fn fetch_page(&self, date: NaiveDate, page: u32) -> Result<Page, FetchError>;
}

/// Why pagination stopped before the reported total was reached.
#[derive(Debug)]
pub struct Truncation {
    /// The page that failed.
    pub page: u32,
    /// The failure.
    pub error: FetchError,
}

/// Everything retrieved for one day.
#[derive(Debug)]
pub struct DateFetch {
    /// The day that was fetched.
    pub date: NaiveDate,
    /// Records from every successful page, in fetch order.
    pub records: Vec<MeasurementRecord>,
    /// Total reported by the last successful page (0 if none succeeded).
    pub found: u64,
    /// Number of pages fetched successfully.
    pub pages_fetched: u32,
    /// Set when pagination stopped early.
    pub truncation: Option<Truncation>,
}

impl DateFetch {
    /// Returns true if pagination stopped before the result set was complete.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

/// Fetches every page of measurements for `date`.
///
/// Starts at page 1 and stops at the first page where
/// `found <= page * page_size`. A failing page ends pagination early: the
/// records gathered so far are kept and the failure is recorded in
/// [`DateFetch::truncation`] rather than returned as an error. A page with no
/// records before the total is reached is treated the same way.
pub async fn fetch_all_for_date<S>(source: &S, date: NaiveDate) -> DateFetch
where
    S: PageSource + ?Sized,
{
    let page_size = u64::from(source.page_size().max(1));
    let mut records = Vec::new();
    let mut found = 0;
    let mut pages_fetched = 0;
    let mut page = 1u32;

    let truncation = loop {
        match source.fetch_page(date, page).await {
            Ok(result) => {
                pages_fetched += 1;
                found = result.found;
                let received = result.records.len();
                records.extend(result.records);
                log::debug!("{date} page {page}: {received} records ({found} reported)");

                if found <= u64::from(page) * page_size {
                    break None;
                }
                if received == 0 {
                    break Some(Truncation {
                        page,
                        error: FetchError::Malformed {
                            page,
                            reason: format!("empty page before {found} records were reached"),
                        },
                    });
                }
                page += 1;
            }
            Err(error) => break Some(Truncation { page, error }),
        }
    };

    if let Some(truncation) = &truncation {
        log::warn!(
            "{date}: pagination stopped at page {}, keeping {} records from {pages_fetched} pages: {}",
            truncation.page,
            records.len(),
            truncation.error
        );
    }

    DateFetch {
        date,
        records,
        found,
        pages_fetched,
        truncation,
    }
}

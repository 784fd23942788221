//! Per-day orchestration over a date range.

use aqstream_cache::{CacheStore, Deduped, dedup_records};
use aqstream_fetch::{PageSource, Truncation, fetch_all_for_date};
use aqstream_types::{AqError, DateRange, MeasurementRecord};
use chrono::NaiveDate;
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Run-level options for the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Serve a day from the cache when an entry exists.
    pub use_cache: bool,
    /// Pause between consecutive days, to respect upstream rate limits.
    pub pull_frequency: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            use_cache: false,
            pull_frequency: Duration::from_secs(10),
        }
    }
}

/// Where a day's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Read back from the date cache without touching the network.
    Cache,
    /// Fetched from the upstream API.
    Upstream,
}

impl RecordOrigin {
    /// Returns the origin as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Upstream => "upstream",
        }
    }
}

impl std::fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One day's deduplicated records.
#[derive(Debug)]
pub struct DailyRecords {
    /// The day.
    pub date: NaiveDate,
    /// Records for the day, one per record key.
    pub records: Vec<MeasurementRecord>,
    /// Where the records came from.
    pub origin: RecordOrigin,
    /// Set when pagination stopped before the full result set was fetched.
    pub truncation: Option<Truncation>,
    /// Records dropped because a keying field was missing.
    pub dropped: usize,
}

impl DailyRecords {
    /// Returns true if the upstream result set for the day is incomplete.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

/// Walks a date range, producing each day's records from cache or upstream.
///
/// The orchestrator owns the page source (and with it the HTTP connection
/// pool) and the cache for the lifetime of a run.
#[derive(Debug)]
pub struct DailyOrchestrator<S> {
    source: S,
    cache: CacheStore,
    config: RunConfig,
}

impl<S: PageSource> DailyOrchestrator<S> {
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(source: S, cache: CacheStore, config: RunConfig) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Returns the date cache.
    #[must_use]
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Returns a lazy stream with one item per day of `range`, ascending.
    ///
    /// A day is only fetched when the stream is polled for it, so the
    /// consumer finishes with one day before the next is requested. Every
    /// day after the first is preceded by a pause of
    /// [`RunConfig::pull_frequency`].
    pub fn run(&self, range: DateRange) -> impl Stream<Item = DailyRecords> + '_ {
        stream::iter(range.days().enumerate()).then(move |(index, date)| async move {
            if index > 0 && !self.config.pull_frequency.is_zero() {
                tokio::time::sleep(self.config.pull_frequency).await;
            }
            self.records_for_date(date).await
        })
    }

    /// Produces the records for a single day.
    ///
    /// Never fails: fetch problems yield the partial result, an unreadable
    /// cache entry falls back to fetching, and a failed cache write still
    /// returns the freshly fetched records. A day on which no page could be
    /// fetched leaves the cache untouched and serves the existing entry, if
    /// there is one.
    pub async fn records_for_date(&self, date: NaiveDate) -> DailyRecords {
        if self.config.use_cache && self.cache.exists(date) {
            match self.read_cached(date).await {
                Ok(records) => {
                    log::info!("{date}: {} records from cache", records.len());
                    return DailyRecords {
                        date,
                        records,
                        origin: RecordOrigin::Cache,
                        truncation: None,
                        dropped: 0,
                    };
                }
                Err(e) => log::warn!("{date}: ignoring unreadable cache entry: {e}"),
            }
        }

        log::info!("Fetching records from {date}");
        let fetched = fetch_all_for_date(&self.source, date).await;

        if fetched.pages_fetched == 0 {
            return self.unfetched_day(date, fetched.truncation).await;
        }

        let deduped = Arc::new(dedup_records(fetched.records));
        if let Err(e) = self.persist(date, Arc::clone(&deduped)).await {
            log::error!("{date}: failed to update cache: {e}");
        }
        let deduped = Arc::try_unwrap(deduped).unwrap_or_else(|shared| (*shared).clone());

        let dropped = deduped.dropped;
        let records = deduped.into_records();
        log::info!(
            "{date}: {} records fetched over {} pages ({} reported)",
            records.len(),
            fetched.pages_fetched,
            fetched.found
        );

        DailyRecords {
            date,
            records,
            origin: RecordOrigin::Upstream,
            truncation: fetched.truncation,
            dropped,
        }
    }

    /// Builds the result for a day on which not a single page succeeded.
    ///
    /// The cache only ever holds the outcome of a fetch that returned data,
    /// so an existing entry is served instead of being replaced.
    async fn unfetched_day(
        &self,
        date: NaiveDate,
        truncation: Option<Truncation>,
    ) -> DailyRecords {
        let (records, origin) = if self.cache.exists(date) {
            match self.read_cached(date).await {
                Ok(records) => {
                    log::warn!(
                        "{date}: nothing fetched, keeping {} cached records",
                        records.len()
                    );
                    (records, RecordOrigin::Cache)
                }
                Err(e) => {
                    log::warn!("{date}: nothing fetched and cache entry unreadable: {e}");
                    (Vec::new(), RecordOrigin::Upstream)
                }
            }
        } else {
            log::warn!("{date}: nothing fetched, cache left empty");
            (Vec::new(), RecordOrigin::Upstream)
        };

        DailyRecords {
            date,
            records,
            origin,
            truncation,
            dropped: 0,
        }
    }

    /// Reads the cache entry for `date` on the blocking thread pool.
    async fn read_cached(
        &self,
        date: NaiveDate,
    ) -> aqstream_types::Result<Vec<MeasurementRecord>> {
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || cache.read_all(date))
            .await
            .map_err(|e| AqError::Cache(format!("spawn_blocking failed: {e}")))?
            .map_err(AqError::from)
    }

    /// Writes `deduped` as the cache entry for `date` on the blocking thread pool.
    async fn persist(
        &self,
        date: NaiveDate,
        deduped: Arc<Deduped>,
    ) -> aqstream_types::Result<()> {
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || cache.store_deduped(date, &deduped))
            .await
            .map_err(|e| AqError::Cache(format!("spawn_blocking failed: {e}")))?
            .map_err(AqError::from)
    }
}

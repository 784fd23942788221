//! Daily OpenAQ measurement ingestion.
//!
//! This is a facade crate that re-exports functionality from the aqstream
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use aqstream_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = FetchClient::with_defaults()?;
//!     let cache = CacheStore::with_default_path()?;
//!     let orchestrator = DailyOrchestrator::new(client, cache, RunConfig::default());
//!
//!     let range = DateRange::new(
//!         chrono::NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
//!         chrono::NaiveDate::from_ymd_opt(2020, 5, 3).unwrap(),
//!     )?;
//!
//!     let publisher = NdjsonPublisher::new(std::io::stdout(), BatchSettings::default())?;
//!     let summary = publish_daily(orchestrator.run(range), &publisher).await;
//!     publisher.close().await?;
//!
//!     eprintln!("Published {} records", summary.records);
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/aqstream/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use aqstream_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use aqstream_fetch::{
    ClientConfig, DateFetch, FetchClient, FetchError, Page, PageSource, Truncation,
    fetch_all_for_date, parse_page, url,
};

// Re-export the date cache
#[cfg(feature = "cache")]
pub use aqstream_cache::{CacheError, CacheStore, Deduped, Snapshot, dedup_records};

// Re-export sinks
#[cfg(feature = "sink")]
pub use aqstream_sink::{
    Ack, BatchSettings, MessageId, NdjsonPublisher, Sink, SinkError, encode_record, log_ack,
};

// Re-export orchestration
#[cfg(feature = "pipeline")]
pub use aqstream_pipeline::{
    DailyOrchestrator, DailyRecords, PublishSummary, RecordOrigin, RunConfig, publish_daily,
};

/// Prelude module for convenient imports.
///
/// ```
/// use aqstream_lib::prelude::*;
/// ```
pub mod prelude {
    pub use aqstream_types::{AqError, DateRange, DateRangeError, MeasurementRecord, Result};

    #[cfg(feature = "fetch")]
    pub use aqstream_fetch::{ClientConfig, FetchClient, PageSource};

    #[cfg(feature = "cache")]
    pub use aqstream_cache::CacheStore;

    #[cfg(feature = "sink")]
    pub use aqstream_sink::{BatchSettings, NdjsonPublisher, Sink};

    #[cfg(feature = "pipeline")]
    pub use aqstream_pipeline::{DailyOrchestrator, DailyRecords, RunConfig, publish_daily};
}

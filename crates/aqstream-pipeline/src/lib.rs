//! Daily fetch, cache and publish orchestration for aqstream.
//!
//! - [`DailyOrchestrator`] - Lazily produces each day's records from cache or upstream
//! - [`DailyRecords`] - One day's deduplicated records and how they were obtained
//! - [`publish_daily`] - Hands every record of every day to a [`aqstream_sink::Sink`]

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/aqstream/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod orchestrator;
mod publish;

pub use orchestrator::{DailyOrchestrator, DailyRecords, RecordOrigin, RunConfig};
pub use publish::{PublishSummary, publish_daily};

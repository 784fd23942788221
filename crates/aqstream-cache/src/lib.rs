//! Per-date record cache for the aqstream measurement pipeline.
//!
//! - [`dedup_records`] - Folds a raw record sequence into one record per key
//! - [`CacheStore`] - On-disk store holding one snapshot per calendar day
//! - [`Snapshot`] - The deduplicated result of a replacement

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/aqstream/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dedup;
mod store;

pub use dedup::{Deduped, dedup_records};
pub use store::{CacheError, CacheStore, Result, Snapshot};

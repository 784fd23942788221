//! Core types for the aqstream air-quality measurement pipeline.
//!
//! This crate provides the fundamental data structures used throughout aqstream:
//!
//! - [`MeasurementRecord`] - A single sensor reading as returned by the upstream API
//! - [`RecordKey`] - Composite identity used to deduplicate records
//! - [`key_of`] - Derives the [`RecordKey`] for a record
//! - [`DateRange`] - Inclusive range of calendar days to stream

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/aqstream/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod key;
mod record;

pub use date_range::{DateRange, DayIterator};
pub use error::{AqError, DateRangeError, IncompleteRecordError, Result};
pub use key::{KEY_DELIMITER, KEY_FIELDS, RecordKey, key_of};
pub use record::MeasurementRecord;

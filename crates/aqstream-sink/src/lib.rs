//! Batching message sink for the aqstream measurement pipeline.
//!
//! - [`Sink`] - Non-blocking publish interface with per-message acknowledgements
//! - [`BatchSettings`] - Count, size and latency thresholds for a batch
//! - [`NdjsonPublisher`] - Sink writing newline-delimited JSON batches to any writer
//! - [`encode_record`] - Compact UTF-8 JSON encoding of a record
//! - [`log_ack`] - Fire-and-forget acknowledgement observer

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/aqstream/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ack;
mod ndjson;
mod sink;

pub use ack::{Ack, MessageId, log_ack};
pub use ndjson::NdjsonPublisher;
pub use sink::{BatchSettings, Sink, SinkError, encode_record};

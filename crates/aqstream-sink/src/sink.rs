//! Sink interface and batch configuration.

use aqstream_types::{AqError, MeasurementRecord};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::Ack;

/// Errors reported by a sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Batch settings are unusable.
    #[error("Invalid batch settings: {0}")]
    InvalidSettings(String),

    /// The sink has shut down and accepts no more messages.
    #[error("Sink is closed")]
    Closed,

    /// Writing a batch failed; every message in it is lost.
    #[error("Write failed: {0}")]
    Write(String),
}

impl From<SinkError> for AqError {
    fn from(error: SinkError) -> Self {
        Self::Sink(error.to_string())
    }
}

/// Thresholds that trigger a batch flush.
///
/// A batch is flushed as soon as any one threshold is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    /// Maximum number of messages in a batch.
    pub max_messages: usize,
    /// Maximum cumulative payload size of a batch, in bytes.
    pub max_bytes: usize,
    /// Maximum time the first message of a batch may wait.
    pub max_latency: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_messages: 1000,
            max_bytes: 1024,
            max_latency: Duration::from_secs(10),
        }
    }
}

impl BatchSettings {
    /// Checks that every threshold is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::InvalidSettings`] naming the first zero threshold.
    pub fn validate(&self) -> Result<(), SinkError> {
        if self.max_messages == 0 {
            return Err(SinkError::InvalidSettings(
                "max_messages must be at least 1".to_string(),
            ));
        }
        if self.max_bytes == 0 {
            return Err(SinkError::InvalidSettings(
                "max_bytes must be at least 1".to_string(),
            ));
        }
        if self.max_latency.is_zero() {
            return Err(SinkError::InvalidSettings(
                "max_latency must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A downstream message sink.
///
/// Publishing only enqueues; delivery happens in the background and is
/// reported through the returned [`Ack`].
#[async_trait]
pub trait Sink: Send + Sync {
    /// Enqueues one message.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Closed`] if the sink no longer accepts messages.
    fn publish(&self, data: Vec<u8>) -> Result<Ack, SinkError>;

    /// Delivers everything queued so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the pending batch could not be written.
    async fn flush(&self) -> Result<(), SinkError>;
}

/// Encodes a record as compact UTF-8 JSON.
#[must_use]
pub fn encode_record(record: &MeasurementRecord) -> Vec<u8> {
    record.to_compact_json().into_bytes()
}

//! Hand-off of daily records to a sink.

use aqstream_sink::{Sink, encode_record, log_ack};
use futures::{Stream, StreamExt};
use std::pin::pin;

use crate::DailyRecords;

/// Totals for a publish run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// Days consumed from the stream.
    pub days: usize,
    /// Records handed to the sink.
    pub records: usize,
    /// Records the sink refused to accept.
    pub publish_failures: usize,
    /// Days whose upstream result set was incomplete.
    pub truncated_days: usize,
}

/// Publishes every record of every day to `sink`.
///
/// Days are consumed one at a time, so the next day is not fetched until
/// every record of the current one has been enqueued. Delivery outcomes are
/// logged in the background and never retried. The sink is flushed once the
/// stream is exhausted.
pub async fn publish_daily<St, K>(days: St, sink: &K) -> PublishSummary
where
    St: Stream<Item = DailyRecords>,
    K: Sink + ?Sized,
{
    let mut days = pin!(days);
    let mut summary = PublishSummary::default();

    while let Some(day) = days.next().await {
        summary.days += 1;
        if let Some(truncation) = &day.truncation {
            summary.truncated_days += 1;
            log::warn!(
                "{}: publishing partial day, page {} failed: {}",
                day.date,
                truncation.page,
                truncation.error
            );
        }

        for record in &day.records {
            match sink.publish(encode_record(record)) {
                Ok(ack) => {
                    summary.records += 1;
                    log_ack(ack);
                }
                Err(e) => {
                    summary.publish_failures += 1;
                    log::error!("{}: failed to publish record: {e}", day.date);
                }
            }
        }
        log::info!(
            "{}: published {} records ({})",
            day.date,
            day.records.len(),
            day.origin
        );
    }

    if let Err(e) = sink.flush().await {
        log::error!("Failed to flush sink: {e}");
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordOrigin;
    use aqstream_fetch::{FetchError, Truncation};
    use aqstream_sink::{Ack, MessageId, SinkError};
    use aqstream_types::MeasurementRecord;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use futures::stream;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Accepts messages immediately, optionally refusing after a limit.
    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<Vec<u8>>>,
        accept_limit: Option<usize>,
        flushes: AtomicUsize,
        closed: AtomicBool,
    }

    #[async_trait]
    impl Sink for RecordingSink {
        fn publish(&self, data: Vec<u8>) -> Result<Ack, SinkError> {
            let mut messages = self.messages.lock().unwrap();
            if self.accept_limit.is_some_and(|limit| messages.len() >= limit) {
                self.closed.store(true, Ordering::SeqCst);
                return Err(SinkError::Closed);
            }
            messages.push(data);

            let (tx, ack) = Ack::channel();
            tx.send(Ok(MessageId::new())).unwrap();
            Ok(ack)
        }

        async fn flush(&self) -> Result<(), SinkError> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn day(d: u32, count: usize) -> DailyRecords {
        let date = NaiveDate::from_ymd_opt(2020, 5, d).unwrap();
        let records = (0..count)
            .map(|i| MeasurementRecord::new(json!({ "location": format!("site-{i}"), "day": d })))
            .collect();
        DailyRecords {
            date,
            records,
            origin: RecordOrigin::Upstream,
            truncation: None,
            dropped: 0,
        }
    }

    #[tokio::test]
    async fn test_publishes_every_record_in_order() {
        let sink = RecordingSink::default();
        let summary = publish_daily(stream::iter(vec![day(1, 2), day(2, 3)]), &sink).await;

        assert_eq!(summary.days, 2);
        assert_eq!(summary.records, 5);
        assert_eq!(summary.publish_failures, 0);
        assert_eq!(sink.flushes.load(Ordering::SeqCst), 1);

        let messages = sink.messages.lock().unwrap();
        let first: serde_json::Value = serde_json::from_slice(&messages[0]).unwrap();
        let last: serde_json::Value = serde_json::from_slice(&messages[4]).unwrap();
        assert_eq!(first, json!({ "location": "site-0", "day": 1 }));
        assert_eq!(last, json!({ "location": "site-2", "day": 2 }));
    }

    #[tokio::test]
    async fn test_counts_refused_records() {
        let sink = RecordingSink {
            accept_limit: Some(3),
            ..Default::default()
        };
        let summary = publish_daily(stream::iter(vec![day(1, 5)]), &sink).await;

        assert!(sink.closed.load(Ordering::SeqCst));
        assert_eq!(summary.records, 3);
        assert_eq!(summary.publish_failures, 2);
    }

    #[tokio::test]
    async fn test_counts_truncated_days() {
        let mut partial = day(1, 1);
        partial.truncation = Some(Truncation {
            page: 2,
            error: FetchError::Transient {
                page: 2,
                reason: "HTTP 503".to_string(),
            },
        });
        let sink = RecordingSink::default();

        let summary = publish_daily(stream::iter(vec![partial, day(2, 1)]), &sink).await;

        assert_eq!(summary.truncated_days, 1);
        assert_eq!(summary.records, 2);
    }

    #[tokio::test]
    async fn test_empty_stream_still_flushes() {
        let sink = RecordingSink::default();
        let summary = publish_daily(stream::iter(Vec::<DailyRecords>::new()), &sink).await;

        assert_eq!(summary, PublishSummary::default());
        assert_eq!(sink.flushes.load(Ordering::SeqCst), 1);
    }
}

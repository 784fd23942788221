//! Per-message acknowledgements.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::SinkError;

/// Identifier assigned to a message once it has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves once the published message has been delivered or has failed.
#[derive(Debug)]
#[must_use = "an Ack does nothing unless awaited or handed to `log_ack`"]
pub struct Ack {
    rx: oneshot::Receiver<Result<MessageId, SinkError>>,
}

impl Ack {
    /// Creates an acknowledgement and the sender that completes it.
    ///
    /// [`Sink`](crate::Sink) implementations hand out the `Ack` and keep the
    /// sender until the message has been delivered.
    #[must_use]
    pub fn channel() -> (oneshot::Sender<Result<MessageId, SinkError>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }
}

impl Future for Ack {
    type Output = Result<MessageId, SinkError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A dropped sender means the sink went away without delivering.
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(SinkError::Closed)))
    }
}

/// Logs the outcome of `ack` in the background without blocking the caller.
///
/// The outcome is observational only; nothing is retried. Must be called
/// from within a tokio runtime.
pub fn log_ack(ack: Ack) {
    tokio::spawn(async move {
        match ack.await {
            Ok(id) => log::debug!("published message {id}"),
            Err(e) => log::error!("failed to publish message: {e}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }

    #[tokio::test]
    async fn test_ack_resolves_with_sent_value() {
        let (tx, ack) = Ack::channel();
        let id = MessageId::new();
        tx.send(Ok(id)).unwrap();

        assert_eq!(ack.await, Ok(id));
    }

    #[tokio::test]
    async fn test_dropped_sender_reports_closed() {
        let (tx, ack) = Ack::channel();
        drop(tx);

        assert_eq!(ack.await, Err(SinkError::Closed));
    }
}

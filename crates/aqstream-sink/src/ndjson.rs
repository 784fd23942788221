//! Newline-delimited JSON publisher.

use async_trait::async_trait;
use std::io::Write;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::{Ack, BatchSettings, MessageId, Sink, SinkError};

enum Command {
    Publish {
        data: Vec<u8>,
        ack: oneshot::Sender<Result<MessageId, SinkError>>,
    },
    Flush(oneshot::Sender<Result<(), SinkError>>),
}

/// Messages waiting for the next flush.
#[derive(Default)]
struct Batch {
    messages: Vec<(Vec<u8>, oneshot::Sender<Result<MessageId, SinkError>>)>,
    bytes: usize,
}

impl Batch {
    fn push(&mut self, data: Vec<u8>, ack: oneshot::Sender<Result<MessageId, SinkError>>) {
        self.bytes += data.len();
        self.messages.push((data, ack));
    }

    fn is_full(&self, settings: &BatchSettings) -> bool {
        self.messages.len() >= settings.max_messages || self.bytes >= settings.max_bytes
    }

    /// Writes every message as one line and resolves its acknowledgement.
    fn flush<W: Write>(&mut self, writer: &mut W) -> Result<(), SinkError> {
        if self.messages.is_empty() {
            return Ok(());
        }

        let messages = std::mem::take(&mut self.messages);
        self.bytes = 0;

        match write_lines(writer, &messages) {
            Ok(()) => {
                log::debug!("flushed batch of {} messages", messages.len());
                for (_, ack) in messages {
                    // The publisher may have stopped listening; delivery still happened.
                    let _ = ack.send(Ok(MessageId::new()));
                }
                Ok(())
            }
            Err(e) => {
                let error = SinkError::Write(e.to_string());
                log::error!("failed to write batch of {} messages: {e}", messages.len());
                for (_, ack) in messages {
                    let _ = ack.send(Err(error.clone()));
                }
                Err(error)
            }
        }
    }
}

fn write_lines<W: Write>(
    writer: &mut W,
    messages: &[(Vec<u8>, oneshot::Sender<Result<MessageId, SinkError>>)],
) -> std::io::Result<()> {
    for (data, _) in messages {
        writer.write_all(data)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Sink that writes batches of messages as newline-delimited JSON.
///
/// A background task owns the writer. Messages are buffered until the batch
/// reaches [`BatchSettings::max_messages`] or [`BatchSettings::max_bytes`],
/// or until [`BatchSettings::max_latency`] has passed since the first
/// message of the batch was queued.
#[derive(Debug)]
pub struct NdjsonPublisher {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl NdjsonPublisher {
    /// Starts a publisher writing to `writer`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::InvalidSettings`] if `settings` has a zero threshold.
    pub fn new<W>(writer: W, settings: BatchSettings) -> Result<Self, SinkError>
    where
        W: Write + Send + 'static,
    {
        settings.validate()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(writer, settings, rx));
        Ok(Self { tx, task })
    }

    /// Flushes whatever is still queued and stops the background task.
    ///
    /// # Errors
    ///
    /// Returns an error if the final batch could not be written.
    pub async fn close(self) -> Result<(), SinkError> {
        let result = self.flush().await;
        drop(self.tx);
        self.task
            .await
            .map_err(|e| SinkError::Write(format!("publisher task failed: {e}")))?;
        result
    }
}

#[async_trait]
impl Sink for NdjsonPublisher {
    fn publish(&self, data: Vec<u8>) -> Result<Ack, SinkError> {
        let (ack_tx, ack) = Ack::channel();
        self.tx
            .send(Command::Publish { data, ack: ack_tx })
            .map_err(|_| SinkError::Closed)?;
        Ok(ack)
    }

    async fn flush(&self) -> Result<(), SinkError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(done_tx))
            .map_err(|_| SinkError::Closed)?;
        done_rx.await.map_err(|_| SinkError::Closed)?
    }
}

/// Background loop owning the writer.
async fn run<W: Write>(
    mut writer: W,
    settings: BatchSettings,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut batch = Batch::default();
    let mut deadline: Option<Instant> = None;

    loop {
        let command = match deadline {
            Some(at) => {
                tokio::select! {
                    command = rx.recv() => command,
                    () = tokio::time::sleep_until(at) => {
                        let _ = batch.flush(&mut writer);
                        deadline = None;
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        match command {
            Some(Command::Publish { data, ack }) => {
                if batch.messages.is_empty() {
                    deadline = Some(Instant::now() + settings.max_latency);
                }
                batch.push(data, ack);
                if batch.is_full(&settings) {
                    let _ = batch.flush(&mut writer);
                    deadline = None;
                }
            }
            Some(Command::Flush(done)) => {
                let _ = done.send(batch.flush(&mut writer));
                deadline = None;
            }
            None => {
                let _ = batch.flush(&mut writer);
                break;
            }
        }
    }
}

//! Inbound loop: drains frames from the server and hands them to an output sink.

use std::io::{self as stdio, Stdout, Write};

use futures_util::{Stream, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use hive_common::Envelope;

use crate::error::{Error, Result};

/// Destination for decoded inbound frames.
pub trait OutputSink: Send + 'static {
    fn deliver(&mut self, text: &str);
}

/// Writes each received frame as a `Received: <text>` line.
///
/// A write failure (e.g. stdout piped into a reader that exited) is logged
/// and the frame is dropped; it does not end the session.
#[derive(Debug)]
pub struct ConsoleSink<W = Stdout> {
    out: W,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(stdio::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send + 'static> OutputSink for ConsoleSink<W> {
    fn deliver(&mut self, text: &str) {
        let written = writeln!(self.out, "Received: {}", text).and_then(|()| self.out.flush());
        if let Err(e) = written {
            tracing::warn!("Cannot write received frame to output: {}", e);
        }
    }
}

/// Reads frames until the connection ends or the token is cancelled.
pub struct InboundLoop<K> {
    sink: K,
    received: u64,
}

impl<K: OutputSink> InboundLoop<K> {
    pub fn new(sink: K) -> Self {
        Self { sink, received: 0 }
    }

    /// Run until cancelled or the connection is lost.
    ///
    /// Returns the number of delivered frames on cancellation. A peer close
    /// frame, end of stream or read error is returned as an error so the
    /// caller can tear the session down.
    pub async fn run<R>(mut self, mut read: R, cancel: CancellationToken) -> Result<u64>
    where
        R: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
    {
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Inbound loop cancelled");
                    return Ok(self.received);
                }
                next = read.next() => next,
            };

            match next {
                Some(Ok(message)) => {
                    if let Some(closed) = self.handle(message) {
                        return closed;
                    }
                }
                Some(Err(e)) => {
                    tracing::error!("WebSocket receive error: {}", e);
                    return Err(Error::Receive(e));
                }
                None => {
                    tracing::info!("Server ended the stream");
                    return Err(Error::ConnectionClosed);
                }
            }
        }
    }

    /// Handle one frame. Returns `Some` when the frame ends the session.
    fn handle(&mut self, message: Message) -> Option<Result<u64>> {
        match message {
            Message::Text(text) => self.emit(&text),
            Message::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => self.emit(&text),
                Err(e) => {
                    tracing::warn!("Skipping binary frame that is not valid UTF-8: {}", e);
                }
            },
            Message::Close(frame) => {
                match frame {
                    Some(frame) => tracing::info!(
                        code = %frame.code,
                        reason = %frame.reason,
                        "Server sent close frame"
                    ),
                    None => tracing::info!("Server sent close frame"),
                }
                return Some(Err(Error::ConnectionClosed));
            }
            // Pings are answered by tungstenite on the next read or write.
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
        None
    }

    fn emit(&mut self, text: &str) {
        if let Some(envelope) = Envelope::peek(text) {
            tracing::debug!(kind = %envelope.kind, data = %envelope.data, "Received typed frame");
        } else {
            tracing::debug!(len = text.len(), "Received frame");
        }
        self.sink.deliver(text);
        self.received += 1;
    }
}

//! Outbound loop: sends a clock frame on a fixed interval.

use std::time::Duration;

use chrono::Utc;
use futures_util::{Sink, SinkExt};
use tokio::time::{interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use hive_common::ClientMessage;

use crate::error::{Error, Result};

pub struct OutboundLoop {
    period: Duration,
}

impl OutboundLoop {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Send one clock frame immediately, then one per period, until cancelled.
    ///
    /// On cancellation a close frame is sent and the number of clock frames
    /// sent is returned. A failed send ends the loop with [`Error::Send`].
    /// Cancellation also interrupts a send the peer is not draining.
    pub async fn run<S>(&self, write: &mut S, cancel: &CancellationToken) -> Result<u64>
    where
        S: Sink<Message, Error = tungstenite::Error> + Unpin,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sent = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    if let Err(e) = write.close().await {
                        tracing::debug!("Close frame not delivered: {}", e);
                    }
                    return Ok(sent);
                }
                _ = ticker.tick() => {}
            }

            let msg = ClientMessage::clock(Utc::now());
            let json = msg.to_json()?;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    // A close frame would queue behind the stalled send.
                    tracing::warn!("Cancelled while a {} frame was pending", msg.kind());
                    return Ok(sent);
                }
                result = write.send(Message::Text(json)) => result,
            };
            result.map_err(|e| {
                tracing::error!("Failed to send {} frame: {}", msg.kind(), e);
                Error::Send(e)
            })?;
            sent += 1;
            tracing::debug!(sent, "Sent {} frame", msg.kind());
        }
    }
}

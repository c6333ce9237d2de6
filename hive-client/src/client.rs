//! Clock client session: one connection, one inbound task, one outbound loop.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::connection::{Connection, ConnectionState};
use crate::error::Result;
use crate::inbound::{ConsoleSink, InboundLoop, OutputSink};
use crate::outbound::OutboundLoop;

/// Outcome of a session that ended by local shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_sent: u64,
    pub frames_received: u64,
    pub final_state: ConnectionState,
}

/// WebSocket clock client.
///
/// Handles the connection lifecycle: connect once, run both loops until
/// shutdown or connection loss. There is no reconnection.
pub struct HiveClient {
    ws_url: String,
    send_interval: Duration,
}

impl HiveClient {
    pub fn new(ws_url: impl Into<String>, send_interval: Duration) -> Self {
        Self {
            ws_url: ws_url.into(),
            send_interval,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.connection.ws_url.clone(), config.clock.interval())
    }

    /// Run a session that prints received frames to stdout.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<SessionSummary> {
        self.run_with_sink(ConsoleSink::stdout(), shutdown).await
    }

    /// Run a session, delivering received frames to `sink`.
    ///
    /// Returns a summary when `shutdown` is cancelled. Any connect, send or
    /// receive failure ends the session with an error; whichever loop sees
    /// the failure first cancels the other.
    pub async fn run_with_sink<K: OutputSink>(
        &self,
        sink: K,
        shutdown: CancellationToken,
    ) -> Result<SessionSummary> {
        tracing::info!(state = %ConnectionState::Connecting, "Connecting to {}", self.ws_url);
        let connection = match Connection::open(&self.ws_url).await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::error!(state = %ConnectionState::Failed, "{}", e);
                return Err(e);
            }
        };
        tracing::info!(state = %ConnectionState::Open, "Connected to {}", connection.url());

        let (mut write, read) = connection.split();
        let session = shutdown.child_token();

        // The inbound task cancels the session when it ends for any reason.
        let inbound_guard = session.clone();
        let inbound_cancel = session.clone();
        let inbound = tokio::spawn(async move {
            let _guard = inbound_guard.drop_guard();
            InboundLoop::new(sink).run(read, inbound_cancel).await
        });

        let outbound = OutboundLoop::new(self.send_interval)
            .run(&mut write, &session)
            .await;
        session.cancel();
        let inbound = inbound.await?;

        // Outbound errors first: a failed send is the more direct cause.
        let result = match (outbound, inbound) {
            (Err(e), _) | (Ok(_), Err(e)) => Err(e),
            (Ok(frames_sent), Ok(frames_received)) => Ok(SessionSummary {
                frames_sent,
                frames_received,
                final_state: ConnectionState::Closed,
            }),
        };

        match &result {
            Ok(summary) => tracing::info!(
                state = %summary.final_state,
                sent = summary.frames_sent,
                received = summary.frames_received,
                "Session ended"
            ),
            Err(e) => tracing::error!(state = %ConnectionState::Failed, "Session ended: {}", e),
        }
        result
    }
}

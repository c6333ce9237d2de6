//! WebSocket connection establishment.

use std::fmt;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::{Error, Result};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of an open connection. Owned by the outbound loop.
pub type FrameWriter = SplitSink<WsStream, Message>;

/// Read half of an open connection. Owned by the inbound loop.
pub type FrameReader = SplitStream<WsStream>;

/// Lifecycle of a client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    /// Ended by local shutdown.
    Closed,
    /// Ended by a connect, send or receive failure.
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
            ConnectionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// An open WebSocket connection to the configured endpoint.
pub struct Connection {
    url: String,
    stream: WsStream,
}

impl Connection {
    /// Open a connection and complete the WebSocket handshake.
    ///
    /// No retry and no timeout: an unreachable endpoint or a rejected
    /// handshake is returned as [`Error::Connect`].
    pub async fn open(url: &str) -> Result<Self> {
        tracing::debug!(url, "Opening WebSocket connection");
        let (stream, response) = connect_async(url).await.map_err(|source| Error::Connect {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!(status = %response.status(), "WebSocket handshake complete");

        Ok(Self {
            url: url.to_string(),
            stream,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Split into the single writer and single reader used by the two loops.
    pub fn split(self) -> (FrameWriter, FrameReader) {
        self.stream.split()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert_eq!(ConnectionState::Closed.to_string(), "closed");
        assert_eq!(ConnectionState::Failed.to_string(), "failed");
    }

    #[tokio::test]
    async fn test_open_refused_endpoint() {
        // Reserve a port, then free it so nothing is listening there.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("ws://{}/hive-ws/", addr);
        let err = Connection::open(&url).await.err().unwrap();
        match err {
            Error::Connect { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("Expected connect error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_rejects_non_websocket_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept and immediately drop: the handshake never completes.
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let url = format!("ws://{}/", addr);
        let result = Connection::open(&url).await;
        assert!(matches!(result, Err(Error::Connect { .. })));
    }

    #[tokio::test]
    async fn test_open_and_split() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let _ws = tokio_tungstenite::accept_async(socket).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        });

        let url = format!("ws://{}/hive-ws/", addr);
        let connection = Connection::open(&url).await.unwrap();
        assert_eq!(connection.url(), url);
        let (_writer, _reader) = connection.split();
    }
}

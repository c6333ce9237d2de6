//! Error types for the clock client.

use tokio_tungstenite::tungstenite;

/// Errors that end a client run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("Send failed: {0}")]
    Send(#[source] tungstenite::Error),

    #[error("Receive failed: {0}")]
    Receive(#[source] tungstenite::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Inbound task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether this error means an open connection was lost mid-session.
    pub fn is_connection_loss(&self) -> bool {
        matches!(
            self,
            Error::Send(_) | Error::Receive(_) | Error::ConnectionClosed
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_loss_classification() {
        assert!(Error::ConnectionClosed.is_connection_loss());
        assert!(Error::Send(tungstenite::Error::ConnectionClosed).is_connection_loss());
        assert!(Error::Receive(tungstenite::Error::AlreadyClosed).is_connection_loss());

        let connect = Error::Connect {
            url: "ws://127.0.0.1:1/".to_string(),
            source: tungstenite::Error::ConnectionClosed,
        };
        assert!(!connect.is_connection_loss());
        assert!(!Error::InvalidConfig("bad".to_string()).is_connection_loss());
    }

    #[test]
    fn test_connect_error_names_url() {
        let err = Error::Connect {
            url: "ws://127.0.0.1:1/hive-ws/".to_string(),
            source: tungstenite::Error::ConnectionClosed,
        };
        assert!(err.to_string().contains("ws://127.0.0.1:1/hive-ws/"));
    }
}

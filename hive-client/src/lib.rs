//! hive-clock client library.
//!
//! Opens one WebSocket connection, sends a `clock` frame on a fixed interval
//! and prints every frame the server sends back.

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod inbound;
pub mod outbound;

pub use client::{HiveClient, SessionSummary};
pub use crate::config::Config;
pub use connection::{Connection, ConnectionState};
pub use error::{Error, Result};
pub use inbound::{ConsoleSink, InboundLoop, OutputSink};
pub use outbound::OutboundLoop;

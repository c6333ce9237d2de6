//! WebSocket protocol types for the hive clock channel.
//!
//! # Protocol Overview
//!
//! Both directions carry UTF-8 JSON text frames over a single WebSocket.
//!
//! ## Client → server
//!
//! The client sends one [`ClientMessage`] per interval. Its shape is fixed:
//!
//! ```json
//! {"type":"clock","data":"2024-05-01T12:00:00.123456789Z"}
//! ```
//!
//! `data` is an RFC 3339 (ISO-8601) UTC timestamp with a `Z` designator.
//!
//! ## Server → client
//!
//! Inbound frames are unconstrained and are displayed as opaque text. Peers on
//! the hive gateway usually relay messages of the same `{type, data}` shape;
//! [`Envelope::peek`] reads those fields when present, for logging only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag carried in the `type` field of every clock frame.
pub const CLOCK_TYPE: &str = "clock";

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Current wall-clock time of the client.
    Clock(DateTime<Utc>),
}

impl ClientMessage {
    /// Clock message for the given instant.
    pub fn clock(at: DateTime<Utc>) -> Self {
        ClientMessage::Clock(at)
    }

    /// The value of the `type` discriminator for this message.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Clock(_) => CLOCK_TYPE,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Best-effort view of an inbound `{type, data}` frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Try to read `type`/`data` out of an inbound text frame.
    ///
    /// Returns `None` for anything that is not a JSON object with a string
    /// `type` field. Never fails: inbound frames have no enforced schema.
    pub fn peek(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clock_message_wire_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let json = ClientMessage::clock(at).to_json().unwrap();
        assert_eq!(json, r#"{"type":"clock","data":"2024-05-01T12:00:00Z"}"#);
    }

    #[test]
    fn test_clock_message_has_exactly_two_fields() {
        let json = ClientMessage::clock(Utc::now()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["type"], CLOCK_TYPE);
        assert!(object["data"].is_string());
    }

    #[test]
    fn test_clock_data_is_utc_timestamp_near_now() {
        let before = Utc::now();
        let json = ClientMessage::clock(Utc::now()).to_json().unwrap();
        let after = Utc::now();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let data = value["data"].as_str().unwrap();
        assert!(data.ends_with('Z'), "timestamp lacks UTC designator: {}", data);

        let parsed = DateTime::parse_from_rfc3339(data).unwrap().with_timezone(&Utc);
        assert!(parsed >= before && parsed <= after);
    }

    #[test]
    fn test_client_message_kind() {
        assert_eq!(ClientMessage::clock(Utc::now()).kind(), "clock");
    }

    #[test]
    fn test_client_message_rejects_unknown_type() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"weather","data":"2024-05-01T12:00:00Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_message_rejects_bad_timestamp() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"clock","data":"yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_envelope_peek_typed_frame() {
        let text = r#"{"type":"clock","data":"2024-05-01T12:00:00Z"}"#;
        let envelope = Envelope::peek(text).unwrap();
        assert_eq!(envelope.kind, "clock");
        assert_eq!(envelope.data, serde_json::json!("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn test_envelope_peek_without_data() {
        let envelope = Envelope::peek(r#"{"type":"notice"}"#).unwrap();
        assert_eq!(envelope.kind, "notice");
        assert!(envelope.data.is_null());
    }

    #[test]
    fn test_envelope_peek_untyped_frames() {
        assert!(Envelope::peek(r#"{"hello":"world"}"#).is_none());
        assert!(Envelope::peek("plain text").is_none());
        assert!(Envelope::peek(r#"{"type":42}"#).is_none());
    }
}

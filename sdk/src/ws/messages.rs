//! Push channel frame types.
//!
//! Every frame on the wire, in both directions, is a JSON object
//! `{"type": ..., "data": ...}`. The `data` member is omitted when empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Heartbeat request sent by the client.
pub const PING: &str = "ping";

/// Heartbeat acknowledgment sent by the server.
pub const PONG: &str = "pong";

/// Full order entity pushed after any change.
pub const ORDER_UPDATE: &str = "order_update";

/// Classification of a frame by its `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Heartbeat request.
    Ping,
    /// Heartbeat acknowledgment.
    Pong,
    /// Order update.
    OrderUpdate,
    /// Any other well-formed type.
    Unknown,
}

impl FrameKind {
    /// Returns true for heartbeat traffic, which carries no domain meaning.
    #[must_use]
    pub const fn is_heartbeat(&self) -> bool {
        matches!(self, Self::Ping | Self::Pong)
    }
}

/// A push channel frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    /// Frame type.
    #[serde(rename = "type")]
    pub kind: String,

    /// Payload.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl EventFrame {
    /// Creates a frame with a payload.
    #[must_use]
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Creates the heartbeat frame.
    #[must_use]
    pub fn ping() -> Self {
        Self::new(PING, Value::Null)
    }

    /// Creates an order update frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be serialized.
    pub fn order_update(order: &crate::types::Order) -> Result<Self, serde_json::Error> {
        Ok(Self::new(ORDER_UPDATE, serde_json::to_value(order)?))
    }

    /// Classifies the frame.
    #[must_use]
    pub fn classify(&self) -> FrameKind {
        match self.kind.as_str() {
            PING => FrameKind::Ping,
            PONG => FrameKind::Pong,
            ORDER_UPDATE => FrameKind::OrderUpdate,
            _ => FrameKind::Unknown,
        }
    }

    /// Serializes the frame to its wire text.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

//! Inbound frame normalization.
//!
//! Turns raw text frames into [`EventFrame`]s, dropping anything that is not
//! JSON of the `{type, data}` shape and every heartbeat acknowledgment.
//! Unknown but well-formed types pass through untouched; deciding whether
//! they matter is left to the subscriber.

use tracing::debug;

use super::messages::{EventFrame, FrameKind};

/// Why a frame was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Not JSON, or JSON without a string `type`.
    Malformed,
    /// Heartbeat acknowledgment.
    HeartbeatAck,
}

/// Outcome of normalizing one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Forward to subscribers.
    Event(EventFrame),
    /// Drop silently.
    Discarded(DiscardReason),
}

impl Normalized {
    /// Returns the event, if any.
    #[must_use]
    pub fn into_event(self) -> Option<EventFrame> {
        match self {
            Self::Event(frame) => Some(frame),
            Self::Discarded(_) => None,
        }
    }
}

/// Normalizes one inbound text frame.
#[must_use]
pub fn normalize(text: &str) -> Normalized {
    let frame: EventFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(error = %e, len = text.len(), "discarding malformed frame");
            return Normalized::Discarded(DiscardReason::Malformed);
        }
    };

    if frame.classify() == FrameKind::Pong {
        return Normalized::Discarded(DiscardReason::HeartbeatAck);
    }

    Normalized::Event(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_order_update() {
        let text = r#"{"type":"order_update","data":{"id":"ord_1"}}"#;
        match normalize(text) {
            Normalized::Event(frame) => {
                assert_eq!(frame.classify(), FrameKind::OrderUpdate);
                assert_eq!(frame.data["id"], "ord_1");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_normalize_pong_discarded() {
        assert_eq!(
            normalize(r#"{"type":"pong"}"#),
            Normalized::Discarded(DiscardReason::HeartbeatAck)
        );
    }

    #[test]
    fn test_normalize_invalid_json_discarded() {
        assert_eq!(
            normalize("{not json"),
            Normalized::Discarded(DiscardReason::Malformed)
        );
    }

    #[test]
    fn test_normalize_missing_type_discarded() {
        assert_eq!(
            normalize(r#"{"data":{}}"#),
            Normalized::Discarded(DiscardReason::Malformed)
        );
    }

    #[test]
    fn test_normalize_non_string_type_discarded() {
        assert_eq!(
            normalize(r#"{"type":42}"#),
            Normalized::Discarded(DiscardReason::Malformed)
        );
    }

    #[test]
    fn test_normalize_unknown_type_forwarded() {
        let event = normalize(r#"{"type":"restaurant_closed","data":{"id":"r1"}}"#).into_event();
        assert_eq!(event.map(|f| f.kind), Some("restaurant_closed".to_string()));
    }
}

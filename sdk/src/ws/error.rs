//! Push channel error types.
//!
//! These errors stay inside the connection manager and the transport. They
//! are logged and turned into reconnect decisions; only configuration errors
//! reach the caller.

/// Push channel errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WsError {
    /// Connection or handshake failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Failed to serialize an outbound frame.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for WsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_error_display() {
        let err = WsError::Connection("timeout".to_string());
        assert_eq!(err.to_string(), "connection failed: timeout");
    }

    #[test]
    fn test_ws_error_from_serde() {
        let err = serde_json::from_str::<u32>("\"x\"").expect_err("not a number");
        assert!(matches!(WsError::from(err), WsError::Serialization(_)));
    }

    #[test]
    fn test_ws_error_invalid_config() {
        let err = WsError::InvalidConfig("url cannot be empty".to_string());
        assert_eq!(err.to_string(), "invalid configuration: url cannot be empty");
    }
}

//! Baseline fetch errors.
//!
//! A failed fetch never touches client state. The caller decides from
//! [`ClientError::is_transient`] whether a later refresh is worth trying.

use std::fmt;

/// Errors from fetching a baseline snapshot.
#[derive(Debug)]
pub enum ClientError {
    /// The request never produced a response.
    Request(reqwest::Error),

    /// The endpoint answered with a body that is not the expected snapshot.
    Deserialization {
        /// Endpoint path.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// The endpoint answered with an error status.
    Api {
        /// HTTP status code.
        status: u16,
        /// Server message, or the raw body.
        message: String,
    },

    /// Still rate limited after the configured retries.
    RateLimited {
        /// Seconds the server asked to wait.
        retry_after: Option<u64>,
    },

    /// The endpoint does not exist for this deployment or role.
    NotFound(String),

    /// No credential is held, or the server rejected it.
    Unauthorized,

    /// Invalid configuration.
    InvalidConfig(String),

    /// Still timing out after the configured retries.
    Timeout,
}

impl ClientError {
    /// Returns true if a later refresh may succeed without user action.
    ///
    /// Server-side trouble (5xx, rate limits, timeouts, unreachable host) is
    /// transient. A missing credential, a wrong path or an unreadable body
    /// will fail the same way next time.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::Api { status, .. } => *status >= 500,
            Self::Deserialization { .. }
            | Self::NotFound(_)
            | Self::Unauthorized
            | Self::InvalidConfig(_) => false,
        }
    }

    pub(crate) fn decode(path: &str, err: impl fmt::Display) -> Self {
        Self::Deserialization {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request failed: {}", e),
            Self::Deserialization { path, message } => {
                write!(f, "unexpected response from {}: {}", path, message)
            }
            Self::Api { status, message } => write!(f, "server error [{}]: {}", status, message),
            Self::RateLimited {
                retry_after: Some(secs),
            } => write!(f, "rate limited, retry after {} seconds", secs),
            Self::RateLimited { retry_after: None } => write!(f, "rate limited"),
            Self::NotFound(path) => write!(f, "no such endpoint: {}", path),
            Self::Unauthorized => write!(f, "credential missing or rejected"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

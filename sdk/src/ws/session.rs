//! Connection state and session bookkeeping.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::backoff::Backoff;
use crate::auth::AuthState;

/// Lifecycle state of the push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Connected; heartbeats running.
    Open,
    /// Teardown in progress.
    Closing,
    /// Not connected. Either waiting for a reconnect or terminal.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
            Self::Closing => write!(f, "closing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// One mounted session of the push channel.
///
/// The reconnect counter survives reconnect cycles and is reset only by a
/// successful open.
#[derive(Debug, Clone)]
pub struct Session {
    endpoint: String,
    auth: AuthState,
    attempt: u32,
    last_open_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session against an endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, auth: AuthState) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth,
            attempt: 0,
            last_open_at: None,
        }
    }

    /// Returns the endpoint, without credential.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the current credential, read fresh on every call.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.auth.token()
    }

    /// Returns the number of reconnects scheduled since the last open.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns when the connection last opened.
    #[must_use]
    pub const fn last_open_at(&self) -> Option<DateTime<Utc>> {
        self.last_open_at
    }

    /// Records a successful open.
    pub fn mark_open(&mut self) {
        self.attempt = 0;
        self.last_open_at = Some(Utc::now());
    }

    /// Returns the delay for the next retry and advances the counter.
    pub fn next_retry(&mut self, backoff: &Backoff) -> Duration {
        let delay = backoff.delay(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert_eq!(ConnectionState::Closing.to_string(), "closing");
        assert_eq!(ConnectionState::Closed.to_string(), "closed");
    }

    #[test]
    fn test_session_retry_advances_counter() {
        let mut session = Session::new("wss://example.com/ws", AuthState::new());
        let backoff = Backoff::default();

        assert_eq!(session.next_retry(&backoff), Duration::from_secs(1));
        assert_eq!(session.next_retry(&backoff), Duration::from_secs(2));
        assert_eq!(session.attempt(), 2);
    }

    #[test]
    fn test_session_open_resets_counter() {
        let mut session = Session::new("wss://example.com/ws", AuthState::new());
        let backoff = Backoff::default();
        session.next_retry(&backoff);
        session.next_retry(&backoff);

        session.mark_open();

        assert_eq!(session.attempt(), 0);
        assert!(session.last_open_at().is_some());
        assert_eq!(session.next_retry(&backoff), Duration::from_secs(1));
    }

    #[test]
    fn test_session_credential_follows_auth() {
        let auth = AuthState::authenticated("tok-1");
        let session = Session::new("wss://example.com/ws", auth.clone());
        assert_eq!(session.credential(), Some("tok-1".to_string()));

        auth.login("tok-2");
        assert_eq!(session.credential(), Some("tok-2".to_string()));

        auth.logout();
        assert!(session.credential().is_none());
    }
}

//! Shared authentication state.
//!
//! A single [`AuthState`] is cloned into every component that needs the
//! bearer credential. Readers always see the latest value, so a credential
//! rotated between two reconnect attempts is picked up by the second one.
//! Clearing it is a logout: live connections observing the state tear
//! themselves down.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Observable bearer credential of the current user session.
#[derive(Clone)]
pub struct AuthState {
    token: Arc<watch::Sender<Option<String>>>,
}

impl AuthState {
    /// Creates an unauthenticated state.
    #[must_use]
    pub fn new() -> Self {
        let (token, _) = watch::channel(None);
        Self {
            token: Arc::new(token),
        }
    }

    /// Creates a state already holding a credential.
    #[must_use]
    pub fn authenticated(token: impl Into<String>) -> Self {
        let state = Self::new();
        state.login(token);
        state
    }

    /// Stores a credential, replacing any previous one.
    pub fn login(&self, token: impl Into<String>) {
        self.token.send_replace(Some(token.into()));
    }

    /// Clears the credential.
    pub fn logout(&self) {
        self.token.send_replace(None);
    }

    /// Returns the current credential.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Returns true if a credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Returns a receiver notified on login, rotation and logout.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_new_is_unauthenticated() {
        let auth = AuthState::new();
        assert!(!auth.is_authenticated());
        assert!(auth.token().is_none());
    }

    #[test]
    fn test_auth_login_logout() {
        let auth = AuthState::new();
        auth.login("tok-1");
        assert_eq!(auth.token(), Some("tok-1".to_string()));

        auth.logout();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_auth_clones_share_state() {
        let auth = AuthState::authenticated("tok-1");
        let other = auth.clone();
        other.login("tok-2");
        assert_eq!(auth.token(), Some("tok-2".to_string()));
    }

    #[test]
    fn test_auth_debug_hides_token() {
        let auth = AuthState::authenticated("secret");
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[tokio::test]
    async fn test_auth_watch_sees_logout() {
        let auth = AuthState::authenticated("tok");
        let mut rx = auth.watch();
        auth.logout();
        rx.changed().await.expect("sender alive");
        assert!(rx.borrow().is_none());
    }
}

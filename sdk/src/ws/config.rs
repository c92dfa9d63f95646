//! Push channel configuration.
//!
//! Provides configuration options for the connection manager.

use std::time::Duration;

use super::backoff::Backoff;
use super::error::WsError;

/// Default push channel URL.
pub const DEFAULT_WS_URL: &str = "wss://api.quickbite.example/ws";

/// Default heartbeat interval in seconds.
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;

/// Default base reconnect delay in milliseconds.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1_000;

/// Maximum reconnect delay in milliseconds.
pub const MAX_RECONNECT_DELAY_MS: u64 = 30_000;

/// Consecutive failures after which a warning is logged.
pub const DEFAULT_WARN_AFTER_ATTEMPTS: u32 = 3;

/// Close code of an intentional, normal closure.
pub const NORMAL_CLOSE_CODE: u16 = 1000;

/// Query parameter carrying the bearer credential.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Push channel configuration.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Push channel URL.
    pub url: String,

    /// Heartbeat interval.
    pub heartbeat_interval: Duration,

    /// Delay before the first reconnect attempt.
    pub reconnect_delay: Duration,

    /// Upper bound of the reconnect delay.
    pub max_reconnect_delay: Duration,

    /// Maximum reconnection attempts (None = unlimited).
    pub max_reconnect_attempts: Option<u32>,

    /// Consecutive failures after which each retry logs a warning.
    pub warn_after_attempts: u32,

    /// Close code treated as an intentional shutdown by the server.
    pub normal_close_code: u16,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WS_URL.to_string(),
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_SECS),
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            max_reconnect_delay: Duration::from_millis(MAX_RECONNECT_DELAY_MS),
            max_reconnect_attempts: None,
            warn_after_attempts: DEFAULT_WARN_AFTER_ATTEMPTS,
            normal_close_code: NORMAL_CLOSE_CODE,
        }
    }
}

impl WsConfig {
    /// Creates a new configuration with the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Sets the initial reconnect delay.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the maximum reconnect delay.
    #[must_use]
    pub fn with_max_reconnect_delay(mut self, delay: Duration) -> Self {
        self.max_reconnect_delay = delay;
        self
    }

    /// Sets the maximum reconnection attempts.
    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }

    /// Sets the failure count after which retries log warnings.
    #[must_use]
    pub fn with_warn_after_attempts(mut self, attempts: u32) -> Self {
        self.warn_after_attempts = attempts;
        self
    }

    /// Returns the reconnect backoff policy.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.reconnect_delay, self.max_reconnect_delay)
    }

    /// Returns the connection URL carrying the given credential.
    #[must_use]
    pub fn connection_url(&self, token: &str) -> String {
        if self.url.contains('?') {
            format!("{}&{}={}", self.url, TOKEN_QUERY_PARAM, token)
        } else {
            format!("{}?{}={}", self.url, TOKEN_QUERY_PARAM, token)
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), WsError> {
        if self.url.is_empty() {
            return Err(WsError::InvalidConfig("url cannot be empty".to_string()));
        }

        if !self.url.starts_with("ws://") && !self.url.starts_with("wss://") {
            return Err(WsError::InvalidConfig(
                "url must start with ws:// or wss://".to_string(),
            ));
        }

        if self.heartbeat_interval.is_zero() {
            return Err(WsError::InvalidConfig(
                "heartbeat_interval must be > 0".to_string(),
            ));
        }

        if self.reconnect_delay > self.max_reconnect_delay {
            return Err(WsError::InvalidConfig(
                "reconnect_delay must be <= max_reconnect_delay".to_string(),
            ));
        }

        Ok(())
    }
}

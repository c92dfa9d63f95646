//! Sync service configuration.
//!
//! Provides configuration options for the live views and the
//! `quickbite-sync` binary.

use std::fmt;
use std::str::FromStr;

use quickbite_sdk::client::ClientConfig;
use quickbite_sdk::ws::WsConfig;
use quickbite_store::DEFAULT_FEED_CAP;
use serde::{Deserialize, Serialize};

pub use quickbite_sdk::client::config::{DEFAULT_BASE_URL as DEFAULT_API_URL, DEFAULT_PAGE_SIZE};

/// Default push channel URL.
pub const DEFAULT_WS_URL: &str = "wss://api.quickbite.example/ws";

/// Which live view to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Operator dashboard.
    #[default]
    Dashboard,
    /// Paginated order list.
    Orders,
    /// Customer order history.
    Customer,
    /// Driver current and available orders.
    Driver,
}

impl View {
    /// Returns the name used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Orders => "orders",
            Self::Customer => "customer",
            Self::Driver => "driver",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Ok(Self::Dashboard),
            "orders" => Ok(Self::Orders),
            "customer" => Ok(Self::Customer),
            "driver" => Ok(Self::Driver),
            other => Err(ConfigError::InvalidView(other.to_string())),
        }
    }
}

/// Configuration for the live views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// REST API base URL.
    pub api_url: String,

    /// Push channel URL.
    pub ws_url: String,

    /// Length of the dashboard's recent-orders feed.
    pub feed_cap: usize,

    /// Orders per page in the order list.
    pub page_size: u32,

    /// View to run.
    pub view: View,

    /// Signed-in user, for the customer and driver views.
    pub user_id: Option<String>,

    /// Maximum reconnection attempts (None = unlimited).
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            feed_cap: DEFAULT_FEED_CAP,
            page_size: DEFAULT_PAGE_SIZE,
            view: View::default(),
            user_id: None,
            max_reconnect_attempts: None,
        }
    }
}

impl SyncConfig {
    /// Loads the configuration from `QUICKBITE_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result is
    /// invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("QUICKBITE_API_URL") {
            config.api_url = url;
        }
        if let Some(url) = lookup("QUICKBITE_WS_URL") {
            config.ws_url = url;
        }
        if let Some(value) = lookup("QUICKBITE_FEED_CAP") {
            config.feed_cap = parse_number("QUICKBITE_FEED_CAP", &value)?;
        }
        if let Some(value) = lookup("QUICKBITE_PAGE_SIZE") {
            config.page_size = parse_number("QUICKBITE_PAGE_SIZE", &value)?;
        }
        if let Some(value) = lookup("QUICKBITE_VIEW") {
            config.view = value.parse()?;
        }
        if let Some(value) = lookup("QUICKBITE_USER_ID") {
            config.user_id = Some(value).filter(|v| !v.trim().is_empty());
        }
        if let Some(value) = lookup("QUICKBITE_MAX_RECONNECTS") {
            config.max_reconnect_attempts =
                Some(parse_number("QUICKBITE_MAX_RECONNECTS", &value)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the view.
    #[must_use]
    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    /// Sets the dashboard feed length.
    #[must_use]
    pub fn with_feed_cap(mut self, feed_cap: usize) -> Self {
        self.feed_cap = feed_cap;
        self
    }

    /// Sets the order list page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }

        if !self.ws_url.starts_with("ws://") && !self.ws_url.starts_with("wss://") {
            return Err(ConfigError::InvalidWsUrl(self.ws_url.clone()));
        }

        if self.feed_cap == 0 {
            return Err(ConfigError::InvalidFeedCap);
        }

        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        Ok(())
    }

    /// Returns the push channel configuration.
    #[must_use]
    pub fn ws_config(&self) -> WsConfig {
        let config = WsConfig::new(self.ws_url.clone());
        match self.max_reconnect_attempts {
            Some(attempts) => config.with_max_reconnect_attempts(attempts),
            None => config,
        }
    }

    /// Returns the REST client configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_page_size(self.page_size)
    }
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Empty API URL.
    #[error("api_url cannot be empty")]
    EmptyApiUrl,

    /// Push channel URL without a WebSocket scheme.
    #[error("ws_url must start with ws:// or wss://, got {0}")]
    InvalidWsUrl(String),

    /// Zero feed length.
    #[error("feed_cap must be > 0")]
    InvalidFeedCap,

    /// Zero page size.
    #[error("page_size must be > 0")]
    InvalidPageSize,

    /// Unknown view name.
    #[error("unknown view: {0}")]
    InvalidView(String),

    /// Variable that is not a number.
    #[error("{name} must be a valid number, got {value}")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
}

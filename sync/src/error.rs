//! Sync error types.

use quickbite_sdk::client::ClientError;
use quickbite_sdk::ws::WsError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the live views.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Baseline fetch failed. State was left unchanged.
    #[error("baseline fetch failed: {0}")]
    Baseline(#[from] ClientError),

    /// Push channel could not be set up.
    #[error("push channel error: {0}")]
    Channel(#[from] WsError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The view needs a signed-in user id.
    #[error("view requires a user id")]
    MissingUser,
}

impl SyncError {
    /// Returns true if retrying the same operation later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Baseline(e) => e.is_transient(),
            Self::Channel(_) | Self::Config(_) | Self::MissingUser => false,
        }
    }
}

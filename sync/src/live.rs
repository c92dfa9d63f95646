//! Live feed: the push channel wired into the store.

use std::sync::Arc;

use quickbite_sdk::auth::AuthState;
use quickbite_sdk::ws::{
    ConnectionManager, ConnectionState, SubscriptionHandle, SyncMetrics, Transport, WsConfig,
    WsError,
};
use quickbite_store::{Action, Store};
use tracing::info;

/// A mounted push connection whose order events are dispatched to a store.
///
/// Dropping the feed tears the connection down.
#[derive(Debug)]
pub struct LiveFeed {
    manager: ConnectionManager,
    _subscription: SubscriptionHandle,
}

impl LiveFeed {
    /// Opens the push channel and routes its events into `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the push channel configuration is invalid.
    pub fn mount<T: Transport>(
        config: WsConfig,
        auth: AuthState,
        transport: T,
        store: Store,
    ) -> Result<Self, WsError> {
        let manager = ConnectionManager::open(config, auth, transport)?;
        let subscription = manager.subscribe(move |frame| {
            if let Some(action) = Action::from_frame(frame) {
                store.dispatch(action);
            }
        });
        info!(state = %manager.state(), "live feed mounted");

        Ok(Self {
            manager,
            _subscription: subscription,
        })
    }

    /// Returns the connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    /// Returns the connection metrics.
    #[must_use]
    pub fn metrics(&self) -> Arc<SyncMetrics> {
        self.manager.metrics()
    }

    /// Returns the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Tears the connection down and waits for it to finish.
    pub async fn unmount(self) {
        let Self {
            manager,
            _subscription: subscription,
        } = self;
        drop(subscription);
        manager.shutdown().await;
        info!("live feed unmounted");
    }
}

//! Operator dashboard view.
//!
//! Loads the dashboard snapshot, then keeps it current from the push
//! channel: the recent-orders feed is upserted and the counters patched,
//! never recomputed.

use std::sync::Arc;

use quickbite_sdk::auth::AuthState;
use quickbite_sdk::ws::{ConnectionState, Transport, WsConfig};
use quickbite_store::{Action, DashboardState, Store};
use tracing::debug;

use crate::baseline::{report_failure, BaselineSource};
use crate::error::SyncError;
use crate::live::LiveFeed;

/// Live operator dashboard.
#[derive(Debug)]
pub struct DashboardView<B> {
    store: Store,
    baseline: Arc<B>,
    live: Option<LiveFeed>,
}

impl<B: BaselineSource> DashboardView<B> {
    /// Creates an unmounted view.
    #[must_use]
    pub fn new(store: Store, baseline: Arc<B>) -> Self {
        Self {
            store,
            baseline,
            live: None,
        }
    }

    /// Fetches the baseline and opens the push channel.
    ///
    /// A failed baseline fetch is logged and the view still goes live.
    /// Mounting again replaces the previous connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the push channel configuration is invalid.
    pub async fn mount<T: Transport>(
        &mut self,
        config: WsConfig,
        auth: AuthState,
        transport: T,
    ) -> Result<(), SyncError> {
        self.unmount().await;
        if self.refresh().await.is_err() {
            debug!("dashboard mounted without baseline");
        }
        self.live = Some(LiveFeed::mount(config, auth, transport, self.store.clone())?);
        Ok(())
    }

    /// Re-fetches the dashboard snapshot.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. The current state is kept.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        match self.baseline.dashboard().await {
            Ok(snapshot) => {
                self.store
                    .dispatch(Action::DashboardLoaded(Box::new(snapshot)));
                Ok(())
            }
            Err(e) => {
                report_failure("dashboard", &e);
                Err(e.into())
            }
        }
    }

    /// Closes the push channel.
    pub async fn unmount(&mut self) {
        if let Some(live) = self.live.take() {
            live.unmount().await;
        }
    }

    /// Returns true while the push channel is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.live.is_some()
    }

    /// Returns the connection state, `Closed` when unmounted.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.live
            .as_ref()
            .map_or(ConnectionState::Closed, LiveFeed::state)
    }

    /// Returns the live feed, if mounted.
    #[must_use]
    pub fn live(&self) -> Option<&LiveFeed> {
        self.live.as_ref()
    }

    /// Returns a copy of the dashboard state.
    #[must_use]
    pub fn state(&self) -> DashboardState {
        self.store.select(|s| s.dashboard.clone())
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

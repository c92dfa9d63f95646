//! Paginated order list view.

use std::sync::Arc;

use quickbite_sdk::auth::AuthState;
use quickbite_sdk::ws::{ConnectionState, Transport, WsConfig};
use quickbite_store::{Action, OrderListState, Store};
use tracing::debug;

use crate::baseline::{report_failure, BaselineSource};
use crate::error::SyncError;
use crate::live::LiveFeed;

/// Live, paginated order list.
///
/// Live arrivals are prepended to whatever page is loaded and counted in the
/// total.
#[derive(Debug)]
pub struct OrderListView<B> {
    store: Store,
    baseline: Arc<B>,
    page_size: u32,
    page: u32,
    live: Option<LiveFeed>,
}

impl<B: BaselineSource> OrderListView<B> {
    /// Creates an unmounted view showing page 1.
    #[must_use]
    pub fn new(store: Store, baseline: Arc<B>, page_size: u32) -> Self {
        Self {
            store,
            baseline,
            page_size: page_size.max(1),
            page: 1,
            live: None,
        }
    }

    /// Loads the current page and opens the push channel.
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
            debug!("order list mounted without baseline");
        }
        self.live = Some(LiveFeed::mount(config, auth, transport, self.store.clone())?);
        Ok(())
    }

    /// Loads a page, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. The current state and page are kept.
    pub async fn load_page(&mut self, page: u32) -> Result<(), SyncError> {
        let page = page.max(1);
        match self.baseline.orders_page(page, self.page_size).await {
            Ok(orders) => {
                self.page = page;
                self.store.dispatch(Action::OrdersPageLoaded(orders));
                Ok(())
            }
            Err(e) => {
                report_failure("order_list", &e);
                Err(e.into())
            }
        }
    }

    /// Re-fetches the current page.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. The current state is kept.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        self.load_page(self.page).await
    }

    /// Closes the push channel.
    pub async fn unmount(&mut self) {
        if let Some(live) = self.live.take() {
            live.unmount().await;
        }
    }

    /// Returns the loaded page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
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

    /// Returns a copy of the list state.
    #[must_use]
    pub fn state(&self) -> OrderListState {
        self.store.select(|s| s.order_list.clone())
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

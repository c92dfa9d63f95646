//! Customer and driver views.

use std::sync::Arc;

use quickbite_sdk::auth::AuthState;
use quickbite_sdk::types::{CustomerId, DriverId};
use quickbite_sdk::ws::{ConnectionState, Transport, WsConfig};
use quickbite_store::{Action, Store};
use tracing::{debug, info};

use crate::baseline::{report_failure, BaselineSource};
use crate::error::SyncError;
use crate::live::LiveFeed;

/// Signed-in user of a role view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// A customer following their orders.
    Customer(CustomerId),
    /// A driver following their current job and the jobs on offer.
    Driver(DriverId),
}

impl Role {
    const fn view_name(&self) -> &'static str {
        match self {
            Self::Customer(_) => "customer",
            Self::Driver(_) => "driver",
        }
    }
}

/// Live view of the signed-in user's own orders.
#[derive(Debug)]
pub struct RoleView<B> {
    store: Store,
    baseline: Arc<B>,
    role: Role,
    live: Option<LiveFeed>,
}

impl<B: BaselineSource> RoleView<B> {
    /// Creates an unmounted view.
    #[must_use]
    pub fn new(store: Store, baseline: Arc<B>, role: Role) -> Self {
        Self {
            store,
            baseline,
            role,
            live: None,
        }
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Fetches the baseline and opens the push channel.
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
            debug!(role = ?self.role, "role view mounted without baseline");
        }
        self.live = Some(LiveFeed::mount(config, auth, transport, self.store.clone())?);
        Ok(())
    }

    /// Re-fetches the role's orders.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. The current state is kept.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let action = match &self.role {
            Role::Customer(customer_id) => {
                self.baseline
                    .customer_orders()
                    .await
                    .map(|orders| Action::CustomerOrdersLoaded {
                        customer_id: Some(customer_id.clone()),
                        orders,
                    })
            }
            Role::Driver(driver_id) => {
                self.baseline
                    .driver_orders()
                    .await
                    .map(|baseline| Action::DriverOrdersLoaded {
                        driver_id: Some(driver_id.clone()),
                        current: baseline.current,
                        available: baseline.available,
                    })
            }
        };

        match action {
            Ok(action) => {
                self.store.dispatch(action);
                Ok(())
            }
            Err(e) => {
                report_failure(self.role.view_name(), &e);
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

    /// Closes the push channel and forgets the user's orders and cart.
    pub async fn end_session(&mut self) {
        self.unmount().await;
        self.store.dispatch(Action::SessionEnded);
        info!(role = ?self.role, "session ended");
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

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

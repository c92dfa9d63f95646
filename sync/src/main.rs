//! QuickBite live sync binary.
//!
//! Mounts one live view against the configured backend and logs its state
//! after every change until interrupted.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use quickbite_sdk::auth::AuthState;
use quickbite_sdk::client::QuickbiteClient;
use quickbite_sdk::types::{CustomerId, DriverId};
use quickbite_sdk::ws::WsTransport;
use quickbite_store::{AppState, Store};
use quickbite_sync::{
    DashboardView, OrderListView, Role, RoleView, SyncConfig, SyncError, View,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quickbite_sync=debug,quickbite_sdk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SyncConfig::from_env().context("invalid QUICKBITE_* configuration")?;
    let auth = match env::var("QUICKBITE_TOKEN") {
        Ok(token) if !token.trim().is_empty() => AuthState::authenticated(token),
        _ => {
            warn!("QUICKBITE_TOKEN not set, live updates disabled");
            AuthState::new()
        }
    };

    info!("Starting QuickBite sync");
    info!("API URL: {}", config.api_url);
    info!("Push channel URL: {}", config.ws_url);
    info!("View: {}", config.view);

    let client = Arc::new(
        QuickbiteClient::new(config.client_config(), auth.clone())
            .context("failed to build REST client")?,
    );
    let store = Store::new(AppState::new(config.feed_cap));

    match config.view {
        View::Dashboard => {
            let mut view = DashboardView::new(store.clone(), client);
            view.mount(config.ws_config(), auth, WsTransport).await?;
            follow(&store, |state| {
                info!(
                    recent = state.dashboard.recent.len(),
                    total_orders = state.dashboard.stats.total_orders,
                    active_orders = state.dashboard.stats.active_orders,
                    "dashboard updated"
                );
            })
            .await?;
            view.unmount().await;
        }
        View::Orders => {
            let page_size = client.page_size();
            let mut view = OrderListView::new(store.clone(), client, page_size);
            view.mount(config.ws_config(), auth, WsTransport).await?;
            follow(&store, |state| {
                info!(
                    shown = state.order_list.orders.len(),
                    total = state.order_list.pagination.total,
                    "order list updated"
                );
            })
            .await?;
            view.unmount().await;
        }
        View::Customer | View::Driver => {
            let user_id = config.user_id.clone().ok_or(SyncError::MissingUser)?;
            let role = if config.view == View::Customer {
                Role::Customer(CustomerId::new(user_id))
            } else {
                Role::Driver(DriverId::new(user_id))
            };
            let mut view = RoleView::new(store.clone(), client, role);
            view.mount(config.ws_config(), auth, WsTransport).await?;
            follow(&store, |state| {
                info!(
                    customer_orders = state.customer.orders.len(),
                    current = ?state.driver.current.as_ref().map(|o| o.id.as_str()),
                    available = state.driver.available.len(),
                    "orders updated"
                );
            })
            .await?;
            view.unmount().await;
        }
    }

    info!("Shutting down QuickBite sync");
    Ok(())
}

/// Reports every store change until Ctrl-C.
async fn follow(store: &Store, report: impl Fn(&AppState)) -> anyhow::Result<()> {
    let mut changes = store.changes();
    store.select(&report);

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for shutdown signal")?;
                return Ok(());
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                store.select(&report);
            }
        }
    }
}

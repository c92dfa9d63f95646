//! Baseline snapshot sources.
//!
//! Views fetch a baseline when they mount and on demand. The REST client is
//! the production source; tests substitute their own.

use std::future::Future;

use quickbite_sdk::client::{ClientError, QuickbiteClient};
use quickbite_sdk::types::{DashboardSnapshot, Order, OrdersPage};
use tracing::{error, warn};

/// Driver view baseline: current order and orders on offer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverBaseline {
    /// Order being delivered.
    pub current: Option<Order>,
    /// Orders the driver may accept.
    pub available: Vec<Order>,
}

/// Provides baseline snapshots.
pub trait BaselineSource: Send + Sync + 'static {
    /// Fetches the dashboard snapshot.
    fn dashboard(&self) -> impl Future<Output = Result<DashboardSnapshot, ClientError>> + Send;

    /// Fetches one page of the order listing.
    fn orders_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<OrdersPage, ClientError>> + Send;

    /// Fetches the signed-in customer's orders.
    fn customer_orders(&self) -> impl Future<Output = Result<Vec<Order>, ClientError>> + Send;

    /// Fetches the signed-in driver's orders.
    fn driver_orders(&self) -> impl Future<Output = Result<DriverBaseline, ClientError>> + Send;
}

impl BaselineSource for QuickbiteClient {
    async fn dashboard(&self) -> Result<DashboardSnapshot, ClientError> {
        self.get_dashboard().await
    }

    async fn orders_page(&self, page: u32, page_size: u32) -> Result<OrdersPage, ClientError> {
        self.get_orders(page, page_size).await
    }

    async fn customer_orders(&self) -> Result<Vec<Order>, ClientError> {
        self.get_customer_orders().await
    }

    async fn driver_orders(&self) -> Result<DriverBaseline, ClientError> {
        let (current, available) = tokio::try_join!(
            self.get_current_driver_order(),
            self.get_available_orders()
        )?;
        Ok(DriverBaseline { current, available })
    }
}

/// Logs a failed baseline fetch at a level matching whether it can recover.
pub(crate) fn report_failure(view: &str, err: &ClientError) {
    if err.is_transient() {
        warn!(view, error = %err, "baseline fetch failed, keeping current data until the next refresh");
    } else {
        error!(view, error = %err, "baseline fetch rejected, keeping current data");
    }
}

//! Dashboard aggregate types.
//!
//! The dashboard endpoint returns a baseline snapshot that the live channel
//! later patches in place.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::{Order, OrderStatus};
use super::primitives::RestaurantId;

/// Headline counters shown on the operator dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    /// Orders ever placed.
    pub total_orders: u64,

    /// Revenue across delivered orders.
    pub total_revenue: Decimal,

    /// Orders not yet in a terminal status.
    pub active_orders: u64,

    /// Registered restaurants.
    pub total_restaurants: u64,

    /// Registered customers.
    pub total_customers: u64,
}

/// A restaurant ranked by order volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummary {
    /// Restaurant ID.
    #[serde(alias = "_id")]
    pub id: RestaurantId,

    /// Display name.
    pub name: String,

    /// Orders received.
    #[serde(default)]
    pub order_count: u64,

    /// Revenue earned.
    #[serde(default)]
    pub revenue: Decimal,
}

/// Revenue bucket for the revenue chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    /// Bucket label, typically an ISO date.
    #[serde(alias = "_id")]
    pub date: String,

    /// Revenue in the bucket.
    pub revenue: Decimal,

    /// Orders in the bucket.
    #[serde(default)]
    pub orders: u64,
}

/// Dashboard baseline snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSnapshot {
    /// Headline counters.
    pub stats: DashboardStats,

    /// Most recent orders, newest first.
    pub recent_orders: Vec<Order>,

    /// Restaurants ranked by volume.
    pub top_restaurants: Vec<RestaurantSummary>,

    /// Order count per status.
    pub status_counts: BTreeMap<OrderStatus, u64>,

    /// Revenue per time bucket.
    pub revenue_over_time: Vec<RevenuePoint>,
}

impl DashboardSnapshot {
    /// Returns the count for a status, zero when absent.
    #[must_use]
    pub fn status_count(&self, status: OrderStatus) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

//! Order types for the QuickBite SDK.
//!
//! Provides the order entity pushed over the live channel and returned by
//! the paginated listing endpoint.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::{CustomerId, DriverId, OrderId, RestaurantId};
use crate::error::SdkError;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the customer, awaiting the restaurant.
    Pending,
    /// Accepted by the restaurant.
    Accepted,
    /// Being prepared.
    Preparing,
    /// Ready for pickup.
    Ready,
    /// Picked up by a driver.
    PickedUp,
    /// On the way to the customer.
    OnTheWay,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled by the customer or an operator.
    Cancelled,
    /// Rejected by the restaurant.
    Rejected,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Accepted,
        Self::Preparing,
        Self::Ready,
        Self::PickedUp,
        Self::OnTheWay,
        Self::Delivered,
        Self::Cancelled,
        Self::Rejected,
    ];

    /// Returns true if the order is still in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the order will not change status again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Rejected)
    }

    /// Returns true if a driver is carrying the order.
    #[must_use]
    pub const fn is_in_transit(&self) -> bool {
        matches!(self, Self::PickedUp | Self::OnTheWay)
    }

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::PickedUp => "picked_up",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| SdkError::InvalidStatus(s.to_string()))
    }
}

/// Customer reference embedded in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    /// Customer ID.
    #[serde(alias = "_id")]
    pub id: CustomerId,

    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Restaurant reference embedded in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRef {
    /// Restaurant ID.
    #[serde(alias = "_id")]
    pub id: RestaurantId,

    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Driver reference embedded in an order once a driver is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRef {
    /// Driver ID.
    #[serde(alias = "_id")]
    pub id: DriverId,

    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// An order.
///
/// Orders are only ever replaced as a whole: an incoming order with the same
/// [`OrderId`] supersedes the stored one entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Identity key.
    #[serde(alias = "_id")]
    pub id: OrderId,

    /// Human-facing order number.
    pub order_number: String,

    /// Current status.
    pub status: OrderStatus,

    /// Ordering customer.
    pub customer: CustomerRef,

    /// Fulfilling restaurant.
    pub restaurant: RestaurantRef,

    /// Assigned driver, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverRef>,

    /// Order total.
    pub total: Decimal,

    /// Creation time.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns true if the order is still in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if the given driver is assigned to this order.
    #[must_use]
    pub fn is_assigned_to(&self, driver: &DriverId) -> bool {
        self.driver.as_ref().is_some_and(|d| &d.id == driver)
    }
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page number, starting at 1.
    #[serde(default)]
    pub page: u32,

    /// Page size.
    #[serde(default, alias = "limit")]
    pub page_size: u32,

    /// Total number of orders across all pages.
    pub total: u64,
}

impl Pagination {
    /// Returns the number of pages, at least 1.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.page_size)).max(1)
    }
}

/// One page of the order listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersPage {
    /// Orders on this page, newest first.
    #[serde(default)]
    pub orders: Vec<Order>,

    /// Pagination details.
    pub pagination: Pagination,
}

//! Core types for the QuickBite SDK.
//!
//! This module provides the entities exchanged with the QuickBite backend
//! over REST and the push channel.

pub mod dashboard;
pub mod order;
pub mod primitives;

pub use dashboard::{DashboardSnapshot, DashboardStats, RestaurantSummary, RevenuePoint};
pub use order::{CustomerRef, DriverRef, Order, OrderStatus, OrdersPage, Pagination, RestaurantRef};
pub use primitives::{AddonId, CustomerId, DriverId, MenuItemId, OrderId, RestaurantId};

//! QuickBite SDK - Rust client library for the QuickBite ordering platform.
//!
//! This crate provides the wire types, the REST client used for baseline
//! snapshots, and the push channel that streams order changes.
//!
//! # Core Types
//!
//! - [`Order`]: An order with its lifecycle [`OrderStatus`]
//! - [`OrdersPage`]: One page of the order listing
//! - [`DashboardSnapshot`]: Admin dashboard aggregates
//! - [`AuthState`]: The shared bearer credential
//!
//! # Clients
//!
//! - [`QuickbiteClient`]: REST client for baseline fetches
//! - [`ConnectionManager`]: Self-healing push connection
//!
//! # Example
//!
//! ```rust
//! use quickbite_sdk::{OrderStatus, OrderId};
//!
//! let id: OrderId = "665f1c2a9b".parse().expect("valid id");
//! let status: OrderStatus = "on_the_way".parse().expect("valid status");
//! assert!(status.is_active());
//! assert_eq!(id.as_str(), "665f1c2a9b");
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod types;
pub mod ws;

pub use auth::AuthState;
pub use client::{ClientConfig, ClientError, QuickbiteClient};
pub use error::SdkError;
pub use types::{
    AddonId, CustomerId, CustomerRef, DashboardSnapshot, DashboardStats, DriverId, DriverRef,
    MenuItemId, Order, OrderId, OrderStatus, OrdersPage, Pagination, RestaurantId, RestaurantRef,
    RestaurantSummary, RevenuePoint,
};
pub use ws::{ConnectionManager, ConnectionState, EventFrame, WsConfig, WsTransport};

//! QuickBite Sync - live order views.
//!
//! This crate wires the push channel and the REST baseline into the shared
//! store. Each view fetches its baseline on mount, then follows the push
//! channel until it is unmounted.
//!
//! # Components
//!
//! - [`config`]: Sync configuration
//! - [`baseline`]: Baseline snapshot sources
//! - [`live`]: Push channel routed into the store
//! - [`dashboard`]: Operator dashboard view
//! - [`order_list`]: Paginated order list view
//! - [`role`]: Customer and driver views

pub mod baseline;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod live;
pub mod order_list;
pub mod role;

pub use baseline::{BaselineSource, DriverBaseline};
pub use config::{ConfigError, SyncConfig, View};
pub use dashboard::DashboardView;
pub use error::SyncError;
pub use live::LiveFeed;
pub use order_list::OrderListView;
pub use role::{Role, RoleView};

//! REST client for the QuickBite backend.
//!
//! Fetches the baseline snapshots (paginated orders, dashboard aggregates,
//! role-specific order lists) that the live channel later patches.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickbite_sdk::auth::AuthState;
//! use quickbite_sdk::client::QuickbiteClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthState::authenticated("jwt...");
//!     let client = QuickbiteClient::with_base_url("https://api.quickbite.example/api", auth)?;
//!
//!     let page = client.get_orders(1, 20).await?;
//!     println!("{} of {} orders", page.orders.len(), page.pagination.total);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;

pub use config::{ClientConfig, Endpoints};
pub use error::ClientError;
pub use http::QuickbiteClient;

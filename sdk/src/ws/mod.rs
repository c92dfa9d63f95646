//! Push channel for real-time order events.
//!
//! The server pushes order changes over a persistent WebSocket connection.
//! [`ConnectionManager`] keeps that connection alive for as long as it is
//! mounted and hands every decoded [`EventFrame`] to its subscribers.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickbite_sdk::auth::AuthState;
//! use quickbite_sdk::ws::{ConnectionManager, FrameKind, WsConfig, WsTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthState::authenticated("token");
//!     let manager = ConnectionManager::open(WsConfig::default(), auth, WsTransport)?;
//!
//!     let _subscription = manager.subscribe(|frame| {
//!         if frame.classify() == FrameKind::OrderUpdate {
//!             println!("order changed: {}", frame.data);
//!         }
//!     });
//!
//!     tokio::signal::ctrl_c().await?;
//!     manager.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod backoff;
pub mod config;
pub mod error;
pub mod manager;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod messages;
pub mod metrics;
pub mod normalizer;
pub mod session;
pub mod subscription;
pub mod transport;

pub use backoff::Backoff;
pub use config::WsConfig;
pub use error::WsError;
pub use manager::ConnectionManager;
#[cfg(any(test, feature = "test-util"))]
pub use memory::{Handshake, MemoryPeer, MemoryTransport};
pub use messages::{EventFrame, FrameKind};
pub use metrics::{SyncMetrics, SyncMetricsSnapshot};
pub use normalizer::{normalize, DiscardReason, Normalized};
pub use session::{ConnectionState, Session};
pub use subscription::SubscriptionHandle;
pub use transport::{Link, Outbound, Transport, TransportEvent, WsTransport};

//! QuickBite - real-time order synchronization client.
//!
//! This crate re-exports the workspace members:
//!
//! - [`sdk`]: Domain types, REST client and the push connection
//! - [`store`]: Client-side state and the reducer
//! - [`sync`]: Live dashboard, order list and role views

pub use quickbite_sdk as sdk;
pub use quickbite_store as store;
pub use quickbite_sync as sync;

//! QuickBite Store - client-side state for live order views.
//!
//! This crate holds the state fed by both baseline fetches and push channel
//! events:
//!
//! - [`OrderFeed`]: Ordered, de-duplicated order lists with optional bound
//! - [`Cart`]: Cart lines merged by menu item and add-on set
//! - [`AppState`]: Dashboard, order list, customer and driver slices
//! - [`reduce`]: Folds an [`Action`] into the state
//! - [`Store`]: Shared, versioned handle
//!
//! # Example
//!
//! ```rust
//! use quickbite_store::{reduce, Action, AppState};
//!
//! let state = reduce(AppState::default(), Action::CartClear);
//! assert!(state.cart.is_empty());
//! ```

pub mod action;
pub mod cart;
pub mod feed;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::Action;
pub use cart::{Cart, CartLine, LineKey};
pub use feed::{OrderFeed, Upsert};
pub use reducer::{apply, reduce};
pub use state::{
    AppState, CustomerState, DashboardState, DriverState, OrderListState, DEFAULT_FEED_CAP,
};
pub use store::Store;

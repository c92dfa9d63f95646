//! Actions folded into [`crate::state::AppState`].

use quickbite_sdk::types::{CustomerId, DashboardSnapshot, DriverId, Order, OrdersPage};
use quickbite_sdk::ws::{EventFrame, FrameKind};
use serde::Deserialize;
use tracing::debug;

use crate::cart::{CartLine, LineKey};

/// Something that changes client state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A full order arrived over the push channel.
    OrderUpdated(Box<Order>),

    /// Dashboard baseline fetched.
    DashboardLoaded(Box<DashboardSnapshot>),

    /// Order list page fetched.
    OrdersPageLoaded(OrdersPage),

    /// Customer order history fetched.
    CustomerOrdersLoaded {
        /// Owner of the history.
        customer_id: Option<CustomerId>,
        /// Orders, newest first.
        orders: Vec<Order>,
    },

    /// Driver view fetched.
    DriverOrdersLoaded {
        /// The driver.
        driver_id: Option<DriverId>,
        /// Order being delivered.
        current: Option<Order>,
        /// Orders on offer.
        available: Vec<Order>,
    },

    /// Add a cart line, merging with an equal line.
    CartAdd(CartLine),

    /// Set a cart line's quantity. Zero removes it.
    CartSetQuantity {
        /// Line identity.
        key: LineKey,
        /// New quantity.
        quantity: u32,
    },

    /// Change a cart line's quantity by a delta.
    CartAdjustQuantity {
        /// Line identity.
        key: LineKey,
        /// Change in units.
        delta: i32,
    },

    /// Remove one cart line.
    CartRemove(LineKey),

    /// Empty the cart.
    CartClear,

    /// The user signed out. Per-user slices and the cart are cleared.
    SessionEnded,
}

impl Action {
    /// Returns the action for a push channel frame, if it carries one.
    ///
    /// Only well-formed `order_update` frames map to an action; anything
    /// else is ignored.
    #[must_use]
    pub fn from_frame(frame: &EventFrame) -> Option<Self> {
        if frame.classify() != FrameKind::OrderUpdate {
            debug!(kind = %frame.kind, "ignoring event");
            return None;
        }

        match Order::deserialize(&frame.data) {
            Ok(order) => Some(Self::OrderUpdated(Box::new(order))),
            Err(e) => {
                debug!(error = %e, "ignoring order update with invalid payload");
                None
            }
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OrderUpdated(_) => "order_updated",
            Self::DashboardLoaded(_) => "dashboard_loaded",
            Self::OrdersPageLoaded(_) => "orders_page_loaded",
            Self::CustomerOrdersLoaded { .. } => "customer_orders_loaded",
            Self::DriverOrdersLoaded { .. } => "driver_orders_loaded",
            Self::CartAdd(_) => "cart_add",
            Self::CartSetQuantity { .. } => "cart_set_quantity",
            Self::CartAdjustQuantity { .. } => "cart_adjust_quantity",
            Self::CartRemove(_) => "cart_remove",
            Self::CartClear => "cart_clear",
            Self::SessionEnded => "session_ended",
        }
    }
}

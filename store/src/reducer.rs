//! The reducer.
//!
//! [`reduce`] is the single entry point that folds an [`Action`] into
//! [`AppState`]. An order update is fanned out to every slice from the one
//! event; callers never dispatch per slice.

use tracing::debug;

use crate::action::Action;
use crate::state::AppState;

/// Folds one action into the state.
#[must_use]
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    apply(&mut state, action);
    state
}

/// Folds one action into the state in place.
pub fn apply(state: &mut AppState, action: Action) {
    match action {
        Action::OrderUpdated(order) => {
            debug!(order_id = %order.id, status = %order.status, "order updated");
            state.dashboard.apply_order(&order);
            state.order_list.apply_order(&order);
            state.customer.apply_order(&order);
            state.driver.apply_order(&order);
        }
        Action::DashboardLoaded(snapshot) => state.dashboard.load(*snapshot),
        Action::OrdersPageLoaded(page) => state.order_list.load_page(page),
        Action::CustomerOrdersLoaded {
            customer_id,
            orders,
        } => state.customer.load(customer_id, orders),
        Action::DriverOrdersLoaded {
            driver_id,
            current,
            available,
        } => state.driver.load(driver_id, current, available),
        Action::CartAdd(line) => state.cart.add(line),
        Action::CartSetQuantity { key, quantity } => {
            state.cart.set_quantity(&key, quantity);
        }
        Action::CartAdjustQuantity { key, delta } => {
            state.cart.adjust_quantity(&key, delta);
        }
        Action::CartRemove(key) => {
            state.cart.remove(&key);
        }
        Action::CartClear => state.cart.clear(),
        Action::SessionEnded => {
            state.customer = Default::default();
            state.driver = Default::default();
            state.cart.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use quickbite_sdk::types::{AddonId, CustomerId, DriverId, MenuItemId, OrderStatus};
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::{CartLine, LineKey};
    use crate::feed::fixtures::{driven, order};

    fn update(id: &str, status: OrderStatus) -> Action {
        Action::OrderUpdated(Box::new(order(id, status)))
    }

    #[test]
    fn test_end_to_end_bounded_feed() {
        let mut state = AppState::new(10);

        state = reduce(state, update("A", OrderStatus::Pending));
        state = reduce(state, update("A", OrderStatus::Delivered));
        let feed: Vec<_> = state
            .dashboard
            .recent
            .iter()
            .map(|o| (o.id.as_str().to_string(), o.status))
            .collect();
        assert_eq!(feed, vec![("A".to_string(), OrderStatus::Delivered)]);

        state = reduce(state, update("B", OrderStatus::Pending));
        let feed: Vec<_> = state
            .dashboard
            .recent
            .iter()
            .map(|o| (o.id.as_str().to_string(), o.status))
            .collect();
        assert_eq!(
            feed,
            vec![
                ("B".to_string(), OrderStatus::Pending),
                ("A".to_string(), OrderStatus::Delivered),
            ]
        );
    }

    #[test]
    fn test_fan_out_to_customer_and_driver() {
        let mut state = AppState::default();
        state = reduce(
            state,
            Action::CustomerOrdersLoaded {
                customer_id: Some(CustomerId::new("cus_1")),
                orders: vec![order("C", OrderStatus::OnTheWay)],
            },
        );
        state = reduce(
            state,
            Action::DriverOrdersLoaded {
                driver_id: Some(DriverId::new("drv_1")),
                current: Some(driven("C", OrderStatus::OnTheWay, "drv_1")),
                available: Vec::new(),
            },
        );

        state = reduce(
            state,
            Action::OrderUpdated(Box::new(driven("C", OrderStatus::Delivered, "drv_1"))),
        );

        assert_eq!(
            state.customer.orders.as_slice()[0].status,
            OrderStatus::Delivered
        );
        assert_eq!(
            state.driver.current.as_ref().map(|o| o.status),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(state.customer.orders.len(), 1);
    }

    #[test]
    fn test_order_update_leaves_cart_alone() {
        let line = CartLine::new(MenuItemId::new("ramen"), "Ramen", Decimal::new(1200, 2), 2);
        let mut state = reduce(AppState::default(), Action::CartAdd(line));
        let cart = state.cart.clone();

        state = reduce(state, update("A", OrderStatus::Pending));

        assert_eq!(state.cart, cart);
    }

    #[test]
    fn test_cart_actions() {
        let key = LineKey::new(MenuItemId::new("ramen"), Vec::<AddonId>::new());
        let line = CartLine::new(MenuItemId::new("ramen"), "Ramen", Decimal::new(1200, 2), 1);

        let mut state = AppState::default();
        state = reduce(state, Action::CartAdd(line.clone()));
        state = reduce(state, Action::CartAdd(line));
        assert_eq!(state.cart.item_count(), 2);

        state = reduce(
            state,
            Action::CartAdjustQuantity {
                key: key.clone(),
                delta: 1,
            },
        );
        assert_eq!(state.cart.item_count(), 3);

        state = reduce(
            state,
            Action::CartSetQuantity {
                key: key.clone(),
                quantity: 0,
            },
        );
        assert!(state.cart.is_empty());

        state = reduce(state, Action::CartRemove(key));
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_session_ended_clears_user_slices() {
        let mut state = AppState::default();
        state = reduce(state, update("A", OrderStatus::Pending));
        state = reduce(
            state,
            Action::CustomerOrdersLoaded {
                customer_id: Some(CustomerId::new("cus_1")),
                orders: vec![order("A", OrderStatus::Pending)],
            },
        );
        state = reduce(
            state,
            Action::CartAdd(CartLine::new(
                MenuItemId::new("ramen"),
                "Ramen",
                Decimal::new(1200, 2),
                1,
            )),
        );

        state = reduce(state, Action::SessionEnded);

        assert!(state.customer.orders.is_empty());
        assert!(state.customer.customer_id.is_none());
        assert!(state.cart.is_empty());
        assert_eq!(state.dashboard.recent.len(), 1);
    }
}

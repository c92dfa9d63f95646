//! Order feeds.
//!
//! An [`OrderFeed`] is an ordered list of orders keyed by [`OrderId`]. An
//! incoming order replaces the entry with the same id in place or, when the
//! id is new, goes to the front. Bounded feeds drop from the tail.

use quickbite_sdk::types::{Order, OrderId};
use serde::{Deserialize, Serialize};

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert {
    /// An entry with the same id was replaced. Holds the previous version.
    Replaced(Box<Order>),
    /// The order was new and has been prepended.
    Inserted,
}

/// An ordered list of orders, each id at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFeed {
    orders: Vec<Order>,
    capacity: Option<usize>,
}

impl OrderFeed {
    /// Creates a feed without a length limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Creates a feed holding at most `capacity` orders.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            orders: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Returns the length limit, if any.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Replaces the entry with the same id, or prepends the order.
    pub fn upsert(&mut self, order: Order) -> Upsert {
        if let Some(slot) = self.orders.iter_mut().find(|o| o.id == order.id) {
            let previous = std::mem::replace(slot, order);
            return Upsert::Replaced(Box::new(previous));
        }

        self.orders.insert(0, order);
        self.truncate();
        Upsert::Inserted
    }

    /// Replaces the entry with the same id. Unknown orders are ignored.
    ///
    /// Returns true if an entry was replaced.
    pub fn replace_existing(&mut self, order: &Order) -> bool {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(slot) => {
                slot.clone_from(order);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole feed with a baseline.
    ///
    /// Later duplicates of an id are dropped and the bound is applied.
    pub fn reset(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.orders.clear();
        for order in orders {
            if !self.contains(&order.id) {
                self.orders.push(order);
            }
        }
        self.truncate();
    }

    /// Removes every order.
    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Returns the order with the given id.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Returns true if the feed holds the given id.
    #[must_use]
    pub fn contains(&self, id: &OrderId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns true if the feed is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns the orders, front first.
    #[must_use]
    pub fn as_slice(&self) -> &[Order] {
        &self.orders
    }

    /// Iterates over the orders, front first.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    fn truncate(&mut self) {
        if let Some(capacity) = self.capacity {
            self.orders.truncate(capacity);
        }
    }
}

impl<'a> IntoIterator for &'a OrderFeed {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use quickbite_sdk::types::{
        CustomerId, CustomerRef, DriverId, DriverRef, Order, OrderId, OrderStatus, RestaurantId,
        RestaurantRef,
    };
    use rust_decimal::Decimal;

    pub(crate) fn order(id: &str, status: OrderStatus) -> Order {
        let created_at = Utc
            .with_ymd_and_hms(2026, 10, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Order {
            id: OrderId::new(id),
            order_number: format!("QB-{id}"),
            status,
            customer: CustomerRef {
                id: CustomerId::new("cus_1"),
                name: "Ada".to_string(),
            },
            restaurant: RestaurantRef {
                id: RestaurantId::new("res_1"),
                name: "Noodle Bar".to_string(),
            },
            driver: None,
            total: Decimal::new(2550, 2),
            created_at,
            updated_at: created_at,
        }
    }

    pub(crate) fn driven(id: &str, status: OrderStatus, driver: &str) -> Order {
        Order {
            driver: Some(DriverRef {
                id: DriverId::new(driver),
                name: "Sam".to_string(),
            }),
            ..order(id, status)
        }
    }
}

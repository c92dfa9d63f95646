//! State slices.
//!
//! Each slice holds what one view needs. One order event may touch several
//! slices; [`crate::reducer::reduce`] decides which.

use std::collections::BTreeMap;

use quickbite_sdk::types::{
    CustomerId, DashboardSnapshot, DashboardStats, DriverId, Order, OrderStatus, OrdersPage,
    Pagination, RestaurantSummary, RevenuePoint,
};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::feed::{OrderFeed, Upsert};

/// Default length of the dashboard's recent-orders feed.
pub const DEFAULT_FEED_CAP: usize = 10;

/// Operator dashboard: a baseline snapshot patched by live events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Most recent orders, newest first.
    pub recent: OrderFeed,
    /// Headline counters.
    pub stats: DashboardStats,
    /// Restaurants ranked by volume.
    pub top_restaurants: Vec<RestaurantSummary>,
    /// Order count per status.
    pub status_counts: BTreeMap<OrderStatus, u64>,
    /// Revenue per time bucket.
    pub revenue_over_time: Vec<RevenuePoint>,
    /// True once a baseline has been applied.
    pub loaded: bool,
}

impl DashboardState {
    /// Creates an empty dashboard with the given feed length.
    #[must_use]
    pub fn new(feed_cap: usize) -> Self {
        Self {
            recent: OrderFeed::bounded(feed_cap),
            stats: DashboardStats::default(),
            top_restaurants: Vec::new(),
            status_counts: BTreeMap::new(),
            revenue_over_time: Vec::new(),
            loaded: false,
        }
    }

    /// Replaces everything with a baseline snapshot.
    pub fn load(&mut self, snapshot: DashboardSnapshot) {
        self.recent.reset(snapshot.recent_orders);
        self.stats = snapshot.stats;
        self.top_restaurants = snapshot.top_restaurants;
        self.status_counts = snapshot.status_counts;
        self.revenue_over_time = snapshot.revenue_over_time;
        self.loaded = true;
    }

    /// Returns the count for a status, zero when absent.
    #[must_use]
    pub fn status_count(&self, status: OrderStatus) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Merges a live order into the feed and patches the aggregates.
    ///
    /// Aggregates only move when the change is known for certain: a status
    /// transition of an order already in the feed, or a brand-new pending
    /// order.
    pub fn apply_order(&mut self, order: &Order) {
        let status = order.status;
        let total = order.total;

        match self.recent.upsert(order.clone()) {
            Upsert::Replaced(previous) if previous.status != status => {
                self.decrement(previous.status);
                self.increment(status);
                if previous.status.is_active() && status.is_terminal() {
                    self.stats.active_orders = self.stats.active_orders.saturating_sub(1);
                }
                if status == OrderStatus::Delivered {
                    self.stats.total_revenue += total;
                }
            }
            Upsert::Replaced(_) => {}
            Upsert::Inserted if status == OrderStatus::Pending => {
                self.increment(status);
                self.stats.total_orders = self.stats.total_orders.saturating_add(1);
                self.stats.active_orders = self.stats.active_orders.saturating_add(1);
            }
            Upsert::Inserted => {}
        }
    }

    fn increment(&mut self, status: OrderStatus) {
        let count = self.status_counts.entry(status).or_insert(0);
        *count = count.saturating_add(1);
    }

    fn decrement(&mut self, status: OrderStatus) {
        if let Some(count) = self.status_counts.get_mut(&status) {
            *count = count.saturating_sub(1);
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAP)
    }
}

/// Paginated order list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderListState {
    /// Orders on the loaded page, plus live arrivals at the front.
    pub orders: OrderFeed,
    /// Pagination of the loaded page.
    pub pagination: Pagination,
    /// True once a page has been applied.
    pub loaded: bool,
}

impl OrderListState {
    /// Replaces the list with a page.
    pub fn load_page(&mut self, page: OrdersPage) {
        self.orders.reset(page.orders);
        self.pagination = page.pagination;
        self.loaded = true;
    }

    /// Merges a live order. A new order also counts towards the total.
    pub fn apply_order(&mut self, order: &Order) {
        if self.orders.upsert(order.clone()) == Upsert::Inserted {
            self.pagination.total = self.pagination.total.saturating_add(1);
        }
    }
}

/// Signed-in customer's order history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerState {
    /// Owner of the history, once known.
    pub customer_id: Option<CustomerId>,
    /// Orders, newest first.
    pub orders: OrderFeed,
}

impl CustomerState {
    /// Replaces the history.
    pub fn load(&mut self, customer_id: Option<CustomerId>, orders: Vec<Order>) {
        self.customer_id = customer_id;
        self.orders.reset(orders);
    }

    /// Merges a live order that is already listed or belongs to the owner.
    pub fn apply_order(&mut self, order: &Order) {
        let owned = self
            .customer_id
            .as_ref()
            .is_some_and(|id| id == &order.customer.id);
        if owned || self.orders.contains(&order.id) {
            self.orders.upsert(order.clone());
        }
    }
}

/// Signed-in driver's current job and the jobs on offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverState {
    /// The driver, once known.
    pub driver_id: Option<DriverId>,
    /// Order being delivered.
    pub current: Option<Order>,
    /// Orders the driver may accept.
    pub available: OrderFeed,
}

impl DriverState {
    /// Replaces the driver's view.
    pub fn load(
        &mut self,
        driver_id: Option<DriverId>,
        current: Option<Order>,
        available: Vec<Order>,
    ) {
        self.driver_id = driver_id;
        self.current = current;
        self.available.reset(available);
    }

    /// Replaces the orders this slice already references.
    pub fn apply_order(&mut self, order: &Order) {
        if let Some(current) = self.current.as_mut().filter(|c| c.id == order.id) {
            current.clone_from(order);
        }
        self.available.replace_existing(order);
    }
}

/// All client-side state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Operator dashboard.
    pub dashboard: DashboardState,
    /// Full order list.
    pub order_list: OrderListState,
    /// Customer order history.
    pub customer: CustomerState,
    /// Driver view.
    pub driver: DriverState,
    /// Shopping cart. Never touched by live events.
    pub cart: Cart,
}

impl AppState {
    /// Creates empty state with the given dashboard feed length.
    #[must_use]
    pub fn new(feed_cap: usize) -> Self {
        Self {
            dashboard: DashboardState::new(feed_cap),
            order_list: OrderListState::default(),
            customer: CustomerState::default(),
            driver: DriverState::default(),
            cart: Cart::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAP)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::feed::fixtures::{driven, order};

    fn baseline() -> DashboardSnapshot {
        let mut snapshot = DashboardSnapshot {
            recent_orders: vec![order("a", OrderStatus::Preparing)],
            ..DashboardSnapshot::default()
        };
        snapshot.stats.total_orders = 50;
        snapshot.stats.active_orders = 4;
        snapshot.status_counts.insert(OrderStatus::Preparing, 2);
        snapshot.status_counts.insert(OrderStatus::Pending, 2);
        snapshot
    }

    #[test]
    fn test_dashboard_load_applies_bound() {
        let mut dashboard = DashboardState::new(2);
        let snapshot = DashboardSnapshot {
            recent_orders: vec![
                order("a", OrderStatus::Pending),
                order("b", OrderStatus::Pending),
                order("c", OrderStatus::Pending),
            ],
            ..DashboardSnapshot::default()
        };

        dashboard.load(snapshot);

        assert!(dashboard.loaded);
        assert_eq!(dashboard.recent.len(), 2);
    }

    #[test]
    fn test_dashboard_status_transition_moves_count() {
        let mut dashboard = DashboardState::default();
        dashboard.load(baseline());

        dashboard.apply_order(&order("a", OrderStatus::Ready));

        assert_eq!(dashboard.status_count(OrderStatus::Preparing), 1);
        assert_eq!(dashboard.status_count(OrderStatus::Ready), 1);
        assert_eq!(dashboard.stats.total_orders, 50);
        assert_eq!(dashboard.stats.active_orders, 4);
    }

    #[test]
    fn test_dashboard_delivery_closes_order_and_adds_revenue() {
        let mut dashboard = DashboardState::default();
        dashboard.load(baseline());

        dashboard.apply_order(&order("a", OrderStatus::Delivered));

        assert_eq!(dashboard.stats.active_orders, 3);
        assert_eq!(dashboard.stats.total_revenue, Decimal::new(2550, 2));
        assert_eq!(dashboard.status_count(OrderStatus::Delivered), 1);
    }

    #[test]
    fn test_dashboard_new_pending_order_counts() {
        let mut dashboard = DashboardState::default();
        dashboard.load(baseline());

        dashboard.apply_order(&order("n", OrderStatus::Pending));

        assert_eq!(dashboard.stats.total_orders, 51);
        assert_eq!(dashboard.stats.active_orders, 5);
        assert_eq!(dashboard.status_count(OrderStatus::Pending), 3);
        assert_eq!(dashboard.recent.as_slice()[0].id.as_str(), "n");
    }

    #[test]
    fn test_dashboard_unknown_non_pending_order_leaves_counts() {
        let mut dashboard = DashboardState::default();
        dashboard.load(baseline());
        let before = dashboard.status_counts.clone();

        dashboard.apply_order(&order("x", OrderStatus::Delivered));

        assert_eq!(dashboard.status_counts, before);
        assert_eq!(dashboard.stats.total_orders, 50);
        assert_eq!(dashboard.recent.len(), 2);
    }

    #[test]
    fn test_dashboard_repeated_event_is_stable() {
        let mut dashboard = DashboardState::default();
        dashboard.load(baseline());
        dashboard.apply_order(&order("a", OrderStatus::Ready));
        let once = dashboard.clone();

        dashboard.apply_order(&order("a", OrderStatus::Ready));

        assert_eq!(dashboard, once);
    }

    #[test]
    fn test_order_list_insert_bumps_total() {
        let mut list = OrderListState::default();
        list.load_page(OrdersPage {
            orders: vec![order("a", OrderStatus::Pending)],
            pagination: Pagination {
                page: 1,
                page_size: 20,
                total: 1,
            },
        });

        list.apply_order(&order("a", OrderStatus::Accepted));
        assert_eq!(list.pagination.total, 1);

        list.apply_order(&order("b", OrderStatus::Pending));
        assert_eq!(list.pagination.total, 2);
        assert_eq!(list.orders.len(), 2);
    }

    #[test]
    fn test_customer_ignores_foreign_orders() {
        let mut customer = CustomerState::default();
        customer.load(Some(CustomerId::new("cus_2")), Vec::new());

        customer.apply_order(&order("a", OrderStatus::Pending));

        assert!(customer.orders.is_empty());
    }

    #[test]
    fn test_customer_accepts_own_orders() {
        let mut customer = CustomerState::default();
        customer.load(Some(CustomerId::new("cus_1")), Vec::new());

        customer.apply_order(&order("a", OrderStatus::Pending));

        assert_eq!(customer.orders.len(), 1);
    }

    #[test]
    fn test_driver_replaces_only_referenced_orders() {
        let mut driver = DriverState::default();
        driver.load(
            Some(DriverId::new("drv_1")),
            Some(driven("c", OrderStatus::OnTheWay, "drv_1")),
            vec![order("r", OrderStatus::Ready)],
        );

        driver.apply_order(&order("z", OrderStatus::Ready));
        assert_eq!(driver.available.len(), 1);

        driver.apply_order(&order("r", OrderStatus::Cancelled));
        assert_eq!(driver.available.as_slice()[0].status, OrderStatus::Cancelled);

        driver.apply_order(&driven("c", OrderStatus::Delivered, "drv_1"));
        assert_eq!(
            driver.current.as_ref().map(|o| o.status),
            Some(OrderStatus::Delivered)
        );
    }
}

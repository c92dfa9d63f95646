//! Client configuration.
//!
//! Where the baseline snapshots live and how hard to try fetching them.

use std::time::Duration;

use super::error::ClientError;

/// Default base URL for the API.
pub const DEFAULT_BASE_URL: &str = "https://api.quickbite.example/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default orders per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Paths of the baseline endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Paginated order listing.
    pub orders: String,
    /// Admin dashboard aggregates.
    pub dashboard: String,
    /// Signed-in customer's order history.
    pub customer_orders: String,
    /// Orders a driver may accept.
    pub available_orders: String,
    /// Order the signed-in driver is delivering.
    pub current_driver_order: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            orders: "/orders".to_string(),
            dashboard: "/admin/dashboard".to_string(),
            customer_orders: "/orders/my-orders".to_string(),
            available_orders: "/driver/available-orders".to_string(),
            current_driver_order: "/driver/current-order".to_string(),
        }
    }
}

impl Endpoints {
    /// Returns the listing path for a page. Pages start at 1.
    #[must_use]
    pub fn orders_page(&self, page: u32, page_size: u32) -> String {
        format!("{}?page={}&limit={}", self.orders, page.max(1), page_size.max(1))
    }

    fn all(&self) -> [(&'static str, &str); 5] {
        [
            ("orders", &self.orders),
            ("dashboard", &self.dashboard),
            ("customer_orders", &self.customer_orders),
            ("available_orders", &self.available_orders),
            ("current_driver_order", &self.current_driver_order),
        ]
    }
}

/// REST client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Retries for rate-limited or timed-out requests.
    pub max_retries: u32,

    /// Orders per listing page.
    pub page_size: u32,

    /// Baseline endpoint paths.
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            page_size: DEFAULT_PAGE_SIZE,
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Replaces the endpoint paths.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Returns the absolute URL for an endpoint path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ClientError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::InvalidConfig("timeout must be > 0".to_string()));
        }

        if self.page_size == 0 {
            return Err(ClientError::InvalidConfig("page_size must be > 0".to_string()));
        }

        if let Some((name, _)) = self
            .endpoints
            .all()
            .into_iter()
            .find(|(_, path)| !path.starts_with('/'))
        {
            return Err(ClientError::InvalidConfig(format!(
                "endpoint {name} must start with '/'"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_page_path() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.orders_page(3, 20), "/orders?page=3&limit=20");
        assert_eq!(endpoints.orders_page(0, 0), "/orders?page=1&limit=1");
    }

    #[test]
    fn test_url_joins_base_and_endpoint() {
        let config = ClientConfig::new("https://api.example.com/api/");
        assert_eq!(
            config.url(&config.endpoints.dashboard),
            "https://api.example.com/api/admin/dashboard"
        );
    }

    #[test]
    fn test_custom_endpoints() {
        let config = ClientConfig::new("https://api.example.com").with_endpoints(Endpoints {
            orders: "/v2/orders".to_string(),
            ..Endpoints::default()
        });
        assert_eq!(
            config.url(&config.endpoints.orders_page(2, 50)),
            "https://api.example.com/v2/orders?page=2&limit=50"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("wss://api.example.com").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = ClientConfig::default().with_page_size(0);
        assert!(matches!(
            config.validate(),
            Err(ClientError::InvalidConfig(msg)) if msg.contains("page_size")
        ));
    }

    #[test]
    fn test_validate_rejects_relative_endpoint() {
        let config = ClientConfig::default().with_endpoints(Endpoints {
            customer_orders: "orders/my-orders".to_string(),
            ..Endpoints::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ClientError::InvalidConfig(msg)) if msg.contains("customer_orders")
        ));
    }
}

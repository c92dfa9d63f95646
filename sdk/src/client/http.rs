//! HTTP client implementation.
//!
//! Provides the REST client used to fetch baseline snapshots.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use super::config::ClientConfig;
use super::error::ClientError;
use crate::auth::AuthState;
use crate::types::{DashboardSnapshot, Order, OrdersPage};

const USER_AGENT: &str = concat!("quickbite-sdk/", env!("CARGO_PKG_VERSION"));

/// API error response format.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(alias = "error")]
    message: String,
}

/// Orders list response.
#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<Order>,
}

/// Current driver order response.
#[derive(Debug, Deserialize)]
struct CurrentOrderResponse {
    order: Option<Order>,
}

/// HTTP client for the QuickBite REST API.
#[derive(Debug, Clone)]
pub struct QuickbiteClient {
    config: ClientConfig,
    auth: AuthState,
    http: reqwest::Client,
}

impl QuickbiteClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ClientConfig, auth: AuthState) -> Result<Self, ClientError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { config, auth, http })
    }

    /// Creates a new client with the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_base_url(base_url: impl Into<String>, auth: AuthState) -> Result<Self, ClientError> {
        Self::new(ClientConfig::new(base_url), auth)
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the configured listing page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// Makes an authenticated GET request to the given path.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let token = self.auth.token().ok_or(ClientError::Unauthorized)?;
        let url = self.config.url(path);
        debug!(path, "GET");
        self.request_with_retry(path, || self.http.get(&url).bearer_auth(&token))
            .await
    }

    /// Makes a request with retry logic.
    async fn request_with_retry<T, F>(&self, path: &str, request_fn: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut last_error = None;
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            let response = request_fn().send().await;

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        let body = resp
                            .text()
                            .await
                            .map_err(|e| ClientError::decode(path, e))?;

                        return serde_json::from_str(&body).map_err(|e| ClientError::decode(path, e));
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("Retry-After")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse().ok());

                        if retry_count < self.config.max_retries {
                            let wait_time = retry_after.unwrap_or(1);
                            warn!(wait_time, "rate limited, backing off");
                            tokio::time::sleep(Duration::from_secs(wait_time)).await;
                            retry_count += 1;
                            continue;
                        }

                        return Err(ClientError::RateLimited { retry_after });
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(ClientError::NotFound(path.to_string()));
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(ClientError::Unauthorized);
                    }

                    let body = resp.text().await.unwrap_or_default();
                    let message = serde_json::from_str::<ApiErrorResponse>(&body)
                        .map(|e| e.message)
                        .unwrap_or(body);

                    return Err(ClientError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                Err(e) => {
                    if e.is_timeout() && retry_count < self.config.max_retries {
                        retry_count += 1;
                        tokio::time::sleep(Duration::from_millis(100 * (1 << retry_count))).await;
                        last_error = Some(ClientError::from(e));
                        continue;
                    }
                    return Err(ClientError::from(e));
                }
            }
        }

        Err(last_error.unwrap_or(ClientError::Timeout))
    }

    /// Gets one page of the order listing.
    ///
    /// # Arguments
    ///
    /// * `page` - Page number, starting at 1
    /// * `page_size` - Orders per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_orders(&self, page: u32, page_size: u32) -> Result<OrdersPage, ClientError> {
        let path = self.config.endpoints.orders_page(page, page_size);
        self.get(&path).await
    }

    /// Gets the dashboard baseline snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_dashboard(&self) -> Result<DashboardSnapshot, ClientError> {
        self.get(&self.config.endpoints.dashboard).await
    }

    /// Gets the signed-in customer's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_customer_orders(&self) -> Result<Vec<Order>, ClientError> {
        let response: OrdersResponse = self.get(&self.config.endpoints.customer_orders).await?;
        Ok(response.orders)
    }

    /// Gets the orders a driver may accept.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_available_orders(&self) -> Result<Vec<Order>, ClientError> {
        let response: OrdersResponse = self.get(&self.config.endpoints.available_orders).await?;
        Ok(response.orders)
    }

    /// Gets the order the signed-in driver is currently delivering.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_current_driver_order(&self) -> Result<Option<Order>, ClientError> {
        let response: CurrentOrderResponse = self.get(&self.config.endpoints.current_driver_order).await?;
        Ok(response.order)
    }
}

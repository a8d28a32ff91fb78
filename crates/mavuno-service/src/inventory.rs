//! External product-inventory collaborator.
//!
//! The catalog is out of scope for the auction engine; it is consumed
//! through a trait so the service can run against the real catalog
//! service over HTTP, or an in-memory table in tests and demos.

use dashmap::DashMap;
use mavuno_core::{ProductId, Quantity};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// What the catalog knows about a product, as far as auctions care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Quantity currently on hand.
    pub available_quantity: Quantity,
    /// The product's unit of sale (kg, crate, bag).
    pub unit: String,
    /// Catalog category, stamped onto the auction for list filtering.
    #[serde(default)]
    pub category: Option<String>,
}

/// Inventory lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Product {0} not found in catalog")]
    ProductNotFound(ProductId),

    #[error("Inventory service unavailable: {0}")]
    Unavailable(String),
}

/// Trait for the inventory-check collaborator.
///
/// This trait abstracts the catalog lookup, allowing for:
/// - Unit testing with mock implementations
/// - Different backends (in-memory table, catalog service over HTTP)
pub trait InventoryProvider: Send + Sync {
    /// Look up availability for a product.
    fn check(&self, product: ProductId) -> BoxFuture<'_, Result<ProductSummary, InventoryError>>;
}

/// Arc wrapper for InventoryProvider trait objects.
pub type DynInventory = Arc<dyn InventoryProvider>;

/// In-memory inventory table for tests and the demo binary.
#[derive(Debug, Default)]
pub struct StaticInventory {
    products: DashMap<ProductId, ProductSummary>,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
        }
    }

    /// Set (or replace) a product's summary.
    pub fn set(&self, product: ProductId, summary: ProductSummary) {
        self.products.insert(product, summary);
    }
}

impl InventoryProvider for StaticInventory {
    fn check(&self, product: ProductId) -> BoxFuture<'_, Result<ProductSummary, InventoryError>> {
        let result = self
            .products
            .get(&product)
            .map(|entry| entry.value().clone())
            .ok_or(InventoryError::ProductNotFound(product));
        Box::pin(async move { result })
    }
}

/// Default timeout for catalog requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for the catalog's inventory endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryRequest {
    product_id: ProductId,
}

/// HTTP client against the catalog service's inventory endpoint.
pub struct HttpInventoryClient {
    client: reqwest::Client,
    inventory_url: String,
}

impl HttpInventoryClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `inventory_url` - URL of the catalog inventory endpoint
    /// * `timeout` - per-request timeout; `None` uses the 10s default
    pub fn new(
        inventory_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| {
                InventoryError::Unavailable(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            inventory_url: inventory_url.into(),
        })
    }

    async fn fetch(&self, product: ProductId) -> Result<ProductSummary, InventoryError> {
        debug!(product_id = %product, url = %self.inventory_url, "Checking catalog inventory");

        let response = self
            .client
            .post(&self.inventory_url)
            .json(&InventoryRequest {
                product_id: product,
            })
            .send()
            .await
            .map_err(|e| InventoryError::Unavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InventoryError::ProductNotFound(product));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::Unavailable(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| InventoryError::Unavailable(format!("Failed to parse response: {e}")))
    }
}

impl InventoryProvider for HttpInventoryClient {
    fn check(&self, product: ProductId) -> BoxFuture<'_, Result<ProductSummary, InventoryError>> {
        Box::pin(self.fetch(product))
    }
}

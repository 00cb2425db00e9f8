//! Catalog admin console
//!
//! A client for managing a REST-backed product catalog: it loads the product
//! collection, creates products with image uploads, applies partial updates
//! and deletes products, keeping an in-memory grid in sync with the server.

pub mod config;
pub mod console;
pub mod error;

pub use catalog_admin_products as products;

use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use crate::config::ConsoleConfig;
use crate::console::{Notifications, ProductListView};
use crate::error::Result;
use crate::products::ProductsClient;

/// The main entry point for the catalog console
pub struct CatalogAdmin {
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub config: ConsoleConfig,
    products: Arc<ProductsClient>,
}

impl CatalogAdmin {
    /// Create a new console client
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_admin::{CatalogAdmin, config::ConsoleConfig};
    ///
    /// let config = ConsoleConfig::new("http://localhost:3000").unwrap();
    /// let admin = CatalogAdmin::new(config).unwrap();
    /// let view = admin.product_list_view();
    /// assert!(view.is_empty());
    /// ```
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let http_client = Client::builder()
            .build()
            .map_err(crate::products::ProductsError::from)?;

        let products = ProductsClient::new(config.api_url.as_str(), http_client.clone())?
            .with_request_timeout(config.request_timeout);

        debug!(api_url = %config.api_url, "catalog console initialized");

        Ok(Self {
            http_client,
            config,
            products: Arc::new(products),
        })
    }

    /// Create a console client from `CATALOG_API_URL` and friends
    pub fn from_env() -> Result<Self> {
        Self::new(ConsoleConfig::from_env()?)
    }

    /// Get the products API client
    pub fn products(&self) -> Arc<ProductsClient> {
        Arc::clone(&self.products)
    }

    /// Create a fresh product grid bound to this client
    pub fn product_list_view(&self) -> ProductListView<ProductsClient> {
        ProductListView::with_notifications(
            self.products(),
            Notifications::new(self.config.notification_ttl),
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ConsoleConfig;
    pub use crate::console::{
        CardIntent, DeleteOutcome, ProductField, ProductListView, Severity,
    };
    pub use crate::error::Error;
    pub use crate::products::{NewProduct, Product, ProductApi, ProductDiff, ProductId};
    pub use crate::CatalogAdmin;
}

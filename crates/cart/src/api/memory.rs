//! In-memory stock and catalog implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use rocketshoes_core::ProductId;

use super::{ApiError, ProductCatalog, StockService};
use crate::model::{Product, Stock};

/// In-memory stock and catalog.
///
/// Useful for testing and development. Uses `RwLock` for thread-safe access;
/// clones share the same maps so a test can adjust stock after handing the
/// service to a store.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    inner: Arc<RwLock<Records>>,
}

#[derive(Default)]
struct Records {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a catalog record.
    pub fn insert_product(&self, product: Product) {
        if let Ok(mut records) = self.inner.write() {
            records.products.insert(product.id, product);
        }
    }

    /// Set the available units for `id`.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        if let Ok(mut records) = self.inner.write() {
            records.stock.insert(id, amount);
        }
    }

    /// Drop the stock record for `id`, making stock lookups fail.
    pub fn remove_stock(&self, id: ProductId) {
        if let Ok(mut records) = self.inner.write() {
            records.stock.remove(&id);
        }
    }
}

#[async_trait]
impl StockService for InMemoryApi {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let records = self
            .inner
            .read()
            .map_err(|e| ApiError::Parse(format!("Failed to acquire read lock: {e}")))?;

        records
            .stock
            .get(&id)
            .map(|&amount| Stock { id, amount })
            .ok_or_else(|| ApiError::NotFound(format!("stock/{id}")))
    }
}

#[async_trait]
impl ProductCatalog for InMemoryApi {
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let records = self
            .inner
            .read()
            .map_err(|e| ApiError::Parse(format!("Failed to acquire read lock: {e}")))?;

        records
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("products/{id}")))
    }
}

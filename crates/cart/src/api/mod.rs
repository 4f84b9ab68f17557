//! Stock and product catalog collaborators.
//!
//! # Architecture
//!
//! - [`StockService`] answers "how many units are left" and is queried on
//!   every quantity change; it is never cached
//! - [`ProductCatalog`] returns the full product record and is only hit the
//!   first time a product is added to the cart
//! - [`HttpApi`] implements both against the REST endpoints
//!   (`GET /stock/{id}`, `GET /products/{id}`), caching products via `moka`
//! - [`InMemoryApi`] implements both from in-process maps for development
//!   and tests

mod http;
mod memory;

pub use http::HttpApi;
pub use memory::InMemoryApi;

use async_trait::async_trait;
use thiserror::Error;

use rocketshoes_core::ProductId;

use crate::model::{Product, Stock};

/// Errors that can occur when talking to the stock or catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Source of current stock levels.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the available units for `id`.
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;
}

/// Source of full product records.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch the product record for `id`.
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("stock/7".to_string());
        assert_eq!(err.to_string(), "Not found: stock/7");

        let err = ApiError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
    }
}

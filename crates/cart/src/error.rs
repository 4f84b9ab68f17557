//! Cart operation errors.
//!
//! [`CartError`] keeps the structured cause of a failed operation, while
//! [`CartError::user_message`] collapses it to the text shown to the user.
//! Business-rule rejections (out of stock, not found, invalid amount) get
//! their own variants so callers can tell them apart from transient faults.

use thiserror::Error;

use rocketshoes_core::{ProductId, QuantityError};

use crate::api::ApiError;
use crate::storage::StorageError;

/// Shown when the requested quantity exceeds available stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// The cart operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    /// Generic failure text for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product",
            Self::Remove => "Error removing product",
            Self::UpdateAmount => "Error updating product amount",
        }
    }

    /// Success text, if the operation announces success.
    #[must_use]
    pub const fn success_message(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("Product added to cart"),
            Self::Remove => Some("Product removed from cart"),
            Self::UpdateAmount => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add_product"),
            Self::Remove => write!(f, "remove_product"),
            Self::UpdateAmount => write!(f, "update_product_amount"),
        }
    }
}

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount exceeds available stock.
    #[error("product {product_id} out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Product is not in the cart.
    #[error("product {0} not found in cart")]
    NotFound(ProductId),

    /// Requested amount is not a positive quantity.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] QuantityError),

    /// Stock or catalog lookup failed.
    #[error("API error: {0}")]
    Transient(#[from] ApiError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Whether this is a business-rule rejection rather than a fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::OutOfStock { .. } | Self::NotFound(_) | Self::InvalidAmount(_)
        )
    }

    /// Whether this came from the stock or catalog API.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Text to show the user when `op` failed with this error.
    ///
    /// Only out-of-stock gets a specific message; everything else collapses
    /// to the operation's generic failure text.
    #[must_use]
    pub const fn user_message(&self, op: Operation) -> &'static str {
        match self {
            Self::OutOfStock { .. } => OUT_OF_STOCK_MESSAGE,
            _ => op.failure_message(),
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::NotFound(ProductId::new(3));
        assert_eq!(err.to_string(), "product 3 not found in cart");

        let err = CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "product 1 out of stock: requested 6, available 5"
        );
    }

    #[test]
    fn test_user_messages() {
        let out_of_stock = CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        assert_eq!(out_of_stock.user_message(Operation::Add), OUT_OF_STOCK_MESSAGE);
        assert_eq!(
            out_of_stock.user_message(Operation::UpdateAmount),
            OUT_OF_STOCK_MESSAGE
        );

        let transient = CartError::Transient(ApiError::NotFound("stock/1".to_string()));
        assert_eq!(transient.user_message(Operation::Add), "Error adding product");

        let missing = CartError::NotFound(ProductId::new(1));
        assert_eq!(missing.user_message(Operation::Remove), "Error removing product");
        assert_eq!(
            missing.user_message(Operation::UpdateAmount),
            "Error updating product amount"
        );
    }

    #[test]
    fn test_classification() {
        assert!(CartError::NotFound(ProductId::new(1)).is_rejection());
        assert!(CartError::InvalidAmount(QuantityError::NotPositive(0)).is_rejection());

        let transient = CartError::Transient(ApiError::Parse("bad".to_string()));
        assert!(transient.is_transient());
        assert!(!transient.is_rejection());

        let storage = CartError::Storage(StorageError::Poisoned);
        assert!(!storage.is_transient());
        assert!(!storage.is_rejection());
    }

    #[test]
    fn test_operation_messages() {
        assert_eq!(Operation::Add.success_message(), Some("Product added to cart"));
        assert_eq!(Operation::UpdateAmount.success_message(), None);
        assert_eq!(Operation::Remove.to_string(), "remove_product");
    }
}

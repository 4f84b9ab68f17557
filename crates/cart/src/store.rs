//! Cart state container.
//!
//! [`CartStore`] owns the in-memory cart, mirrors it to [`CartStorage`] after
//! every successful mutation, and checks quantity changes against a
//! [`StockService`] before applying them.
//!
//! # Consistency
//!
//! - Each operation is a read, validate, write sequence over a snapshot of
//!   the cart; nothing is observable until the new cart is committed
//! - The snapshot is written to storage *before* it replaces the in-memory
//!   cart, so a failed write leaves both copies untouched
//! - Mutations are serialized by an async mutex held across the network
//!   fetch; readers never wait on it
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CartStore::load(Collaborators::new(api, storage, notifier), DEFAULT_CART_KEY);
//!
//! store.add_product(ProductId::new(1)).await?;
//! let request = UpdateProductAmount { product_id: ProductId::new(1), amount: 3 };
//! store.update_product_amount(request).await?;
//! store.remove_product(ProductId::new(1)).await?;
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::instrument;

use rocketshoes_core::{ProductId, Quantity};

use crate::api::{ApiError, ProductCatalog, StockService};
use crate::error::{CartError, Operation, Result};
use crate::model::{Cart, CartEntry, UpdateProductAmount};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::storage::{CartStorage, StorageError};

/// External services a [`CartStore`] depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub stock: Arc<dyn StockService>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub storage: Arc<dyn CartStorage>,
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Collaborators where one API client serves both stock and catalog.
    pub fn new<A, S, N>(api: A, storage: S, notifier: N) -> Self
    where
        A: StockService + ProductCatalog + Clone + 'static,
        S: CartStorage + 'static,
        N: Notifier + 'static,
    {
        Self {
            stock: Arc::new(api.clone()),
            catalog: Arc::new(api),
            storage: Arc::new(storage),
            notifier: Arc::new(notifier),
        }
    }

    /// Same as [`Collaborators::new`], reporting through `tracing`.
    pub fn with_tracing<A, S>(api: A, storage: S) -> Self
    where
        A: StockService + ProductCatalog + Clone + 'static,
        S: CartStorage + 'static,
    {
        Self::new(api, storage, TracingNotifier)
    }
}

/// Shopping cart shared across the application.
///
/// This struct is cheaply cloneable via `Arc`; clones operate on the same
/// cart. Hand it to whatever needs cart access instead of keeping it in
/// global state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    services: Collaborators,
    storage_key: String,
    cart: RwLock<Cart>,
    mutation: Mutex<()>,
}

impl CartStore {
    /// Create a store, restoring the cart persisted under `storage_key`.
    ///
    /// A missing, unreadable or corrupt snapshot starts an empty cart.
    pub fn load(services: Collaborators, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let cart = restore(services.storage.as_ref(), &storage_key);

        Self {
            inner: Arc::new(CartStoreInner {
                services,
                storage_key,
                cart: RwLock::new(cart),
                mutation: Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner
            .cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    /// Add one unit of `product_id`.
    ///
    /// Fetches the product from the catalog the first time it is added.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if one more unit exceeds available stock
    /// - [`CartError::Transient`] if the stock or catalog lookup fails
    /// - [`CartError::Storage`] if the cart cannot be persisted
    ///
    /// The outcome is also reported through the notifier; callers that only
    /// need the notification may ignore the result.
    #[instrument(skip(self), fields(op = %Operation::Add))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_add_product(product_id).await;
        self.report(Operation::Add, product_id, &result);
        result
    }

    /// Remove `product_id` from the cart entirely.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] if the product is not in the cart
    /// - [`CartError::Storage`] if the cart cannot be persisted
    #[instrument(skip(self), fields(op = %Operation::Remove))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_remove_product(product_id).await;
        self.report(Operation::Remove, product_id, &result);
        result
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Succeeds silently; only failures are notified.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidAmount`] if the amount is not positive
    /// - [`CartError::NotFound`] if the product is not in the cart
    /// - [`CartError::OutOfStock`] if the amount exceeds available stock
    /// - [`CartError::Transient`] if the stock lookup fails
    /// - [`CartError::Storage`] if the cart cannot be persisted
    #[instrument(skip(self), fields(op = %Operation::UpdateAmount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<()> {
        let result = self.try_update_product_amount(request).await;
        self.report(Operation::UpdateAmount, request.product_id, &result);
        result
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<()> {
        let _guard = self.inner.mutation.lock().await;

        let stock = self.inner.services.stock.stock(product_id).await?;
        let cart = self.cart();

        let updated = if let Some(entry) = cart.get(product_id) {
            let target = entry
                .amount
                .incremented()
                .filter(|amount| stock.covers(*amount))
                .ok_or(CartError::OutOfStock {
                    product_id,
                    requested: u64::from(entry.amount.get()) + 1,
                    available: stock.amount,
                })?;
            cart.with_amount(product_id, target)
                .ok_or(CartError::NotFound(product_id))?
        } else {
            if !stock.covers(Quantity::ONE) {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested: 1,
                    available: stock.amount,
                });
            }

            let product = self.inner.services.catalog.product(product_id).await?;
            if product.id != product_id {
                return Err(catalog_mismatch(product_id, product.id));
            }
            let returned_id = product.id;
            cart.with_entry(CartEntry::new(product))
                .ok_or_else(|| catalog_mismatch(product_id, returned_id))?
        };

        self.commit(updated)
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<()> {
        let _guard = self.inner.mutation.lock().await;

        let updated = self
            .cart()
            .without(product_id)
            .ok_or(CartError::NotFound(product_id))?;

        self.commit(updated)
    }

    async fn try_update_product_amount(&self, request: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = request;
        let amount = Quantity::new(amount)?;

        let _guard = self.inner.mutation.lock().await;

        let cart = self.cart();
        if !cart.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let stock = self.inner.services.stock.stock(product_id).await?;
        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: u64::from(amount.get()),
                available: stock.amount,
            });
        }

        let updated = cart
            .with_amount(product_id, amount)
            .ok_or(CartError::NotFound(product_id))?;

        self.commit(updated)
    }

    /// Persist `cart`, then make it the current cart.
    fn commit(&self, cart: Cart) -> Result<()> {
        let snapshot = serde_json::to_string(&cart).map_err(StorageError::from)?;
        self.inner
            .services
            .storage
            .set_item(&self.inner.storage_key, &snapshot)?;

        *self
            .inner
            .cart
            .write()
            .unwrap_or_else(PoisonError::into_inner) = cart;
        Ok(())
    }

    /// Log the outcome and notify the user.
    fn report(&self, op: Operation, product_id: ProductId, result: &Result<()>) {
        let notifier = &self.inner.services.notifier;

        match result {
            Ok(()) => {
                tracing::debug!(%product_id, "Cart operation succeeded");
                if let Some(message) = op.success_message() {
                    notifier.notify(Notification::success(message));
                }
            }
            Err(err) => {
                if err.is_rejection() {
                    tracing::info!(%product_id, error = %err, "Cart operation rejected");
                } else {
                    tracing::error!(%product_id, error = %err, "Cart operation failed");
                }
                notifier.notify(Notification::error(err.user_message(op)));
            }
        }
    }
}

fn catalog_mismatch(requested: ProductId, returned: ProductId) -> CartError {
    CartError::Transient(ApiError::Parse(format!(
        "catalog returned product {returned} for {requested}"
    )))
}

/// Read the persisted cart, falling back to an empty one.
fn restore(storage: &dyn CartStorage, key: &str) -> Cart {
    match storage.get_item(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Discarding corrupt cart snapshot");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read cart snapshot");
            Cart::new()
        }
    }
}

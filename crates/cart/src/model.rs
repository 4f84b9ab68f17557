//! Cart data model.
//!
//! The JSON shapes here match the catalog API and the persisted snapshot:
//! a cart entry is the catalog product record with an `amount` field added.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rocketshoes_core::{Price, ProductId, Quantity};

/// A catalog product as returned by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Product image URL.
    pub image: String,
}

/// Available units for a product as returned by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `quantity` units can be taken from this stock.
    #[must_use]
    pub const fn covers(&self, quantity: Quantity) -> bool {
        quantity.get() <= self.amount
    }
}

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub amount: Quantity,
}

impl CartEntry {
    /// A new line for `product` with a single unit.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            amount: Quantity::ONE,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.amount)
    }
}

/// A snapshot listed the same product twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicate cart entry for product {0}")]
pub struct DuplicateEntry(pub ProductId);

/// Ordered list of cart entries, unique by product id.
///
/// Serializes as a plain JSON array so the persisted snapshot stays a simple
/// list of entries. Deserializing rejects duplicate product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.amount.get()))
            .sum()
    }

    /// Sum of all entry subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    /// Copy of this cart with `id`'s amount replaced.
    ///
    /// Returns `None` when `id` is not in the cart.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: Quantity) -> Option<Self> {
        let mut entries = self.entries.clone();
        let entry = entries.iter_mut().find(|entry| entry.id() == id)?;
        entry.amount = amount;
        Some(Self { entries })
    }

    /// Copy of this cart with `entry` appended.
    ///
    /// Returns `None` when a line for the same product already exists.
    #[must_use]
    pub fn with_entry(&self, entry: CartEntry) -> Option<Self> {
        if self.contains(entry.id()) {
            return None;
        }
        let mut entries = self.entries.clone();
        entries.push(entry);
        Some(Self { entries })
    }

    /// Copy of this cart without `id`.
    ///
    /// Returns `None` when `id` is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.id() != id)
            .cloned()
            .collect();
        Some(Self { entries })
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = DuplicateEntry;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id()) {
                return Err(DuplicateEntry(entry.id()));
            }
        }
        Ok(Self { entries })
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Request to set a cart line to an exact amount.
///
/// The amount is signed so that non-positive input can be represented and
/// rejected by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

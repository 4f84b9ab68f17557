//! Positive item quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The value is zero or negative.
    #[error("quantity must be positive (got {0})")]
    NotPositive(i64),
    /// The value does not fit in a `u32`.
    #[error("quantity must be at most {max} (got {value})")]
    TooLarge {
        /// The rejected value.
        value: i64,
        /// Maximum allowed quantity.
        max: u32,
    },
}

/// A strictly positive number of units of one product.
///
/// ## Examples
///
/// ```
/// use rocketshoes_core::Quantity;
///
/// assert_eq!(Quantity::new(3).map(Quantity::get), Ok(3));
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(-2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity from a signed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not positive or exceeds `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }

        u32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge {
                value,
                max: u32::MAX,
            })
    }

    /// The number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One more unit, or `None` on overflow.
    #[must_use]
    pub fn incremented(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_rejects_non_positive() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-5), Err(QuantityError::NotPositive(-5)));
    }

    #[test]
    fn test_quantity_rejects_too_large() {
        let too_big = i64::from(u32::MAX) + 1;
        assert!(matches!(
            Quantity::new(too_big),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_quantity_incremented() {
        assert_eq!(Quantity::ONE.incremented().unwrap().get(), 2);
        let max = Quantity::new(i64::from(u32::MAX)).unwrap();
        assert!(max.incremented().is_none());
    }

    #[test]
    fn test_quantity_serde_validates_on_load() {
        assert_eq!(serde_json::to_string(&Quantity::ONE).unwrap(), "1");
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("4").unwrap().get(), 4);
    }

    #[test]
    fn test_quantity_error_display() {
        assert_eq!(
            QuantityError::NotPositive(0).to_string(),
            "quantity must be positive (got 0)"
        );
    }
}

//! Stock level bookkeeping and reservations.
//!
//! A stock level tracks units on hand and units reserved for pending
//! orders. Reserved units stay on hand until they are committed (shipped)
//! or released (order abandoned).

use serde::{Deserialize, Serialize};

/// Errors from stock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },
    #[error("cannot commit {requested} units, only {reserved} reserved")]
    InsufficientReserved { requested: i32, reserved: i32 },
}

/// On-hand and reserved quantities with restock thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub quantity: i32,
    pub reserved_quantity: i32,
    pub minimum_stock: i32,
    pub maximum_stock: i32,
}

impl StockLevel {
    /// Units that can still be reserved.
    #[must_use]
    pub const fn available(&self) -> i32 {
        self.quantity - self.reserved_quantity
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.available() <= self.minimum_stock
    }

    #[must_use]
    pub const fn is_over_stock(&self) -> bool {
        self.quantity >= self.maximum_stock
    }

    /// Hold `quantity` units for a pending order.
    ///
    /// # Errors
    ///
    /// Fails if `quantity` is not positive or exceeds the available units.
    pub const fn reserve(&mut self, quantity: i32) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        let available = self.available();
        if available < quantity {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available,
            });
        }
        self.reserved_quantity += quantity;
        Ok(())
    }

    /// Return reserved units to the available pool. Releasing more than is
    /// reserved clears the reservation.
    ///
    /// # Errors
    ///
    /// Fails if `quantity` is not positive.
    pub fn release(&mut self, quantity: i32) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        self.reserved_quantity = (self.reserved_quantity - quantity).max(0);
        Ok(())
    }

    /// Consume reserved units, removing them from stock.
    ///
    /// # Errors
    ///
    /// Fails if `quantity` is not positive or exceeds the reserved units.
    pub const fn commit(&mut self, quantity: i32) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        if self.reserved_quantity < quantity {
            return Err(InventoryError::InsufficientReserved {
                requested: quantity,
                reserved: self.reserved_quantity,
            });
        }
        self.reserved_quantity -= quantity;
        self.quantity -= quantity;
        Ok(())
    }

    /// Apply a signed correction to on-hand stock, floored at zero.
    pub fn adjust(&mut self, delta: i32) {
        self.quantity = self.quantity.saturating_add(delta).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(quantity: i32, reserved: i32) -> StockLevel {
        StockLevel {
            quantity,
            reserved_quantity: reserved,
            minimum_stock: 5,
            maximum_stock: 100,
        }
    }

    #[test]
    fn test_reserve_within_available() {
        let mut stock = level(10, 2);
        assert_eq!(stock.reserve(8), Ok(()));
        assert_eq!(stock.reserved_quantity, 10);
        assert_eq!(stock.available(), 0);
    }

    #[test]
    fn test_reserve_more_than_available() {
        let mut stock = level(10, 4);
        assert_eq!(
            stock.reserve(7),
            Err(InventoryError::InsufficientStock {
                requested: 7,
                available: 6,
            })
        );
        assert_eq!(stock.reserved_quantity, 4);
    }

    #[test]
    fn test_release_floors_at_zero() {
        let mut stock = level(10, 3);
        assert_eq!(stock.release(5), Ok(()));
        assert_eq!(stock.reserved_quantity, 0);
        assert_eq!(stock.quantity, 10);
    }

    #[test]
    fn test_commit_consumes_reservation() {
        let mut stock = level(10, 4);
        assert_eq!(stock.commit(3), Ok(()));
        assert_eq!(stock.quantity, 7);
        assert_eq!(stock.reserved_quantity, 1);
        assert_eq!(stock.available(), 6);
    }

    #[test]
    fn test_commit_requires_reservation() {
        let mut stock = level(10, 1);
        assert!(matches!(
            stock.commit(2),
            Err(InventoryError::InsufficientReserved { .. })
        ));
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        let mut stock = level(10, 1);
        assert_eq!(stock.reserve(0), Err(InventoryError::InvalidQuantity));
        assert_eq!(stock.release(-1), Err(InventoryError::InvalidQuantity));
        assert_eq!(stock.commit(0), Err(InventoryError::InvalidQuantity));
    }

    #[test]
    fn test_adjust() {
        let mut stock = level(10, 0);
        stock.adjust(5);
        assert_eq!(stock.quantity, 15);
        stock.adjust(-40);
        assert_eq!(stock.quantity, 0);
    }

    #[test]
    fn test_thresholds() {
        assert!(level(5, 0).is_low_stock());
        assert!(level(10, 5).is_low_stock());
        assert!(!level(6, 0).is_low_stock());
        assert!(level(100, 0).is_over_stock());
        assert!(!level(99, 0).is_over_stock());
    }
}

//! Shopping cart line management.
//!
//! A cart belongs to exactly one customer and holds at most one line per
//! product. Totals are always derived from the lines, never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CustomerId, ProductId};

/// Largest quantity a single cart or order line may hold.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    #[error("quantity cannot exceed {MAX_LINE_QUANTITY}")]
    QuantityTooLarge,
    #[error("price cannot be negative")]
    NegativePrice,
    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductId),
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub product_image: Option<String>,
}

impl CartLine {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Input for adding a product to a cart.
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub product_image: Option<String>,
}

/// A customer's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    customer_id: CustomerId,
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart for `customer_id`.
    #[must_use]
    pub const fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            lines: Vec::new(),
        }
    }

    /// Rebuild a cart from persisted lines.
    #[must_use]
    pub const fn from_lines(customer_id: CustomerId, lines: Vec<CartLine>) -> Self {
        Self { customer_id, lines }
    }

    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a product to the cart.
    ///
    /// If the product is already present its quantity is increased and its
    /// name, price, and image are refreshed from `line`; otherwise a new line
    /// is appended.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a non-positive quantity,
    /// `CartError::QuantityTooLarge` if the line would exceed
    /// [`MAX_LINE_QUANTITY`], and `CartError::NegativePrice` for a negative
    /// price.
    #[allow(clippy::indexing_slicing)] // index comes from position() or the push
    pub fn add_item(&mut self, line: NewCartLine) -> Result<&CartLine, CartError> {
        if line.quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }
        if line.price.is_sign_negative() {
            return Err(CartError::NegativePrice);
        }
        let held = self
            .position(line.product_id)
            .map_or(0, |index| self.lines[index].quantity);
        if line.quantity > MAX_LINE_QUANTITY - held {
            return Err(CartError::QuantityTooLarge);
        }

        let index = match self.position(line.product_id) {
            Some(index) => {
                let existing = &mut self.lines[index];
                existing.quantity += line.quantity;
                existing.product_name = line.product_name;
                existing.price = line.price;
                if line.product_image.is_some() {
                    existing.product_image = line.product_image;
                }
                index
            }
            None => {
                self.lines.push(CartLine {
                    product_id: line.product_id,
                    product_name: line.product_name,
                    price: line.price,
                    quantity: line.quantity,
                    product_image: line.product_image,
                });
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[index])
    }

    /// Set the quantity of an existing line. A quantity of zero or less
    /// removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the product is not in the cart
    /// and `CartError::QuantityTooLarge` above [`MAX_LINE_QUANTITY`].
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_item(product_id)?;
            return Ok(());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or(CartError::ItemNotFound(product_id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the product is not in the cart.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<CartLine, CartError> {
        let index = self
            .position(product_id)
            .ok_or(CartError::ItemNotFound(product_id))?;
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.quantity)).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}

//! Cart wire models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use websale_core::cart::{Cart, CartLine};
use websale_core::{CartId, CustomerId, ProductId};

/// A persisted cart with its row metadata.
#[derive(Debug, Clone)]
pub struct StoredCart {
    pub id: CartId,
    pub cart: Cart,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
    pub product_image: Option<String>,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            price: line.price,
            quantity: line.quantity,
            total_price: line.total_price(),
            product_image: line.product_image.clone(),
        }
    }
}

/// Cart response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: CartId,
    pub customer_id: CustomerId,
    pub items: Vec<CartItemView>,
    pub total_amount: Decimal,
    pub total_items: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredCart> for CartView {
    fn from(stored: &StoredCart) -> Self {
        Self {
            id: stored.id,
            customer_id: stored.cart.customer_id(),
            items: stored.cart.lines().iter().map(CartItemView::from).collect(),
            total_amount: stored.cart.total_amount(),
            total_items: stored.cart.total_items(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// Add-to-cart request body. Name, price and image come from the catalog.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemInput {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Quantity update request body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateCartItemInput {
    pub quantity: i32,
}

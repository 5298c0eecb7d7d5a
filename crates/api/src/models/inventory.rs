//! Inventory models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use websale_core::inventory::StockLevel;
use websale_core::{InventoryItemId, ProductId};

/// Stock record for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub product_id: ProductId,
    pub sku: String,
    pub stock: StockLevel,
    pub cost: Decimal,
    pub location: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire form of an inventory item, with derived availability flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemView {
    pub id: InventoryItemId,
    pub product_id: ProductId,
    pub sku: String,
    pub quantity: i32,
    pub reserved_quantity: i32,
    pub available_quantity: i32,
    pub cost: Decimal,
    pub location: String,
    pub minimum_stock: i32,
    pub maximum_stock: i32,
    pub is_low_stock: bool,
    pub is_over_stock: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InventoryItem> for InventoryItemView {
    fn from(item: InventoryItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            sku: item.sku,
            quantity: item.stock.quantity,
            reserved_quantity: item.stock.reserved_quantity,
            available_quantity: item.stock.available(),
            cost: item.cost,
            location: item.location,
            minimum_stock: item.stock.minimum_stock,
            maximum_stock: item.stock.maximum_stock,
            is_low_stock: item.stock.is_low_stock(),
            is_over_stock: item.stock.is_over_stock(),
            is_active: item.is_active,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

const fn default_maximum_stock() -> i32 {
    1000
}

/// Input for creating an inventory item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryInput {
    pub product_id: ProductId,
    pub sku: String,
    pub quantity: i32,
    pub cost: Decimal,
    pub location: String,
    #[serde(default)]
    pub minimum_stock: i32,
    #[serde(default = "default_maximum_stock")]
    pub maximum_stock: i32,
}

/// Signed stock correction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustInput {
    pub quantity: i32,
    #[serde(default)]
    pub reason: String,
}

/// Quantity for reserve, release and commit.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuantityInput {
    pub quantity: i32,
}

//! Inventory repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use websale_core::inventory::StockLevel;
use websale_core::{InventoryItemId, ProductId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::inventory::{CreateInventoryInput, InventoryItem};

const INVENTORY_COLUMNS: &str = "id, product_id, sku, quantity, reserved_quantity, cost, \
                                 location, minimum_stock, maximum_stock, is_active, \
                                 created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: i32,
    product_id: i32,
    sku: String,
    quantity: i32,
    reserved_quantity: i32,
    cost: Decimal,
    location: String,
    minimum_stock: i32,
    maximum_stock: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        Self {
            id: InventoryItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            sku: row.sku,
            stock: StockLevel {
                quantity: row.quantity,
                reserved_quantity: row.reserved_quantity,
                minimum_stock: row.minimum_stock,
                maximum_stock: row.maximum_stock,
            },
            cost: row.cost,
            location: row.location,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an inventory item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product already has one.
    pub async fn create(&self, input: &CreateInventoryInput) -> Result<InventoryItem, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "INSERT INTO websale.inventory_item
                (product_id, sku, quantity, cost, location, minimum_stock, maximum_stock)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {INVENTORY_COLUMNS}"
        ))
        .bind(input.product_id)
        .bind(&input.sku)
        .bind(input.quantity)
        .bind(input.cost)
        .bind(&input.location)
        .bind(input.minimum_stock)
        .bind(input.maximum_stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "an inventory item already exists for this product"))?;

        Ok(row.into())
    }

    /// Get the inventory item of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<InventoryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM websale.inventory_item WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(InventoryItem::from))
    }

    /// Active items whose available stock is at or below their minimum,
    /// most depleted first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_low_stock(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM websale.inventory_item
             WHERE is_active AND quantity - reserved_quantity <= minimum_stock
             ORDER BY quantity - reserved_quantity - minimum_stock, product_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Lock a product's inventory row for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product has no inventory item.
    pub async fn lock(
        conn: &mut PgConnection,
        product_id: ProductId,
    ) -> Result<InventoryItem, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM websale.inventory_item
             WHERE product_id = $1
             FOR UPDATE"
        ))
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Write back the quantities of a locked item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item disappeared.
    pub async fn save_stock(
        conn: &mut PgConnection,
        id: InventoryItemId,
        stock: &StockLevel,
    ) -> Result<InventoryItem, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "UPDATE websale.inventory_item
             SET quantity = $2, reserved_quantity = $3
             WHERE id = $1
             RETURNING {INVENTORY_COLUMNS}"
        ))
        .bind(id)
        .bind(stock.quantity)
        .bind(stock.reserved_quantity)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}

//! Inventory service.
//!
//! Stock mutations lock the product's inventory row (`SELECT ... FOR
//! UPDATE`), apply the [`StockLevel`] rule and write the quantities back
//! inside one transaction, so concurrent reservations never oversell.

use sqlx::PgPool;

use websale_core::ProductId;
use websale_core::events::DomainEvent;
use websale_core::inventory::{InventoryError, StockLevel};

use super::events::EventBus;
use super::validation::Validator;
use super::{OrNotFound, ServiceError};
use crate::db::inventory::InventoryRepository;
use crate::models::inventory::{CreateInventoryInput, InventoryItem};
use crate::state::AppState;

/// Validate a new inventory item.
///
/// # Errors
///
/// Returns `ServiceError::Validation` listing every failed rule.
pub fn validate_inventory(input: &CreateInventoryInput) -> Result<(), ServiceError> {
    Validator::new()
        .length("sku", &input.sku, 1, 50)
        .check(input.quantity >= 0, "quantity cannot be negative")
        .non_negative("cost", input.cost)
        .money("cost", input.cost)
        .length("location", &input.location, 1, 100)
        .check(input.minimum_stock >= 0, "minimumStock cannot be negative")
        .check(input.maximum_stock > 0, "maximumStock must be greater than 0")
        .check(
            input.maximum_stock >= input.minimum_stock,
            "maximumStock must be at least minimumStock",
        )
        .finish()
}

/// Inventory service.
pub struct InventoryService<'a> {
    pool: &'a PgPool,
    items: InventoryRepository<'a>,
    events: &'a EventBus,
}

impl<'a> InventoryService<'a> {
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self {
            pool: state.pool(),
            items: InventoryRepository::new(state.pool()),
            events: state.events(),
        }
    }

    /// Create the inventory record of a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for invalid input and
    /// `ServiceError::Conflict` if the product already has a record.
    pub async fn create(&self, input: CreateInventoryInput) -> Result<InventoryItem, ServiceError> {
        validate_inventory(&input)?;
        let item = self.items.create(&input).await?;
        tracing::info!(
            product_id = %item.product_id,
            sku = %item.sku,
            quantity = item.stock.quantity,
            "Inventory item created"
        );
        Ok(item)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product has no record.
    pub async fn get(&self, product_id: ProductId) -> Result<InventoryItem, ServiceError> {
        self.items
            .get_by_product(product_id)
            .await?
            .or_not_found("inventory item")
    }

    /// Items at or below their minimum stock.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, ServiceError> {
        Ok(self.items.list_low_stock().await?)
    }

    /// Apply a signed correction to the on-hand quantity, flooring at 0.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a zero delta and
    /// `ServiceError::NotFound` if the product has no record.
    pub async fn adjust(
        &self,
        product_id: ProductId,
        delta: i32,
        reason: &str,
    ) -> Result<InventoryItem, ServiceError> {
        if delta == 0 {
            return Err(ServiceError::Validation(
                "adjustment quantity cannot be 0".to_string(),
            ));
        }

        let item = self
            .mutate(product_id, |stock| {
                stock.adjust(delta);
                Ok(())
            })
            .await?;

        tracing::info!(%product_id, delta, reason, quantity = item.stock.quantity, "Stock adjusted");
        self.events.publish(DomainEvent::InventoryAdjusted {
            product_id,
            delta,
            quantity: item.stock.quantity,
        });
        Ok(item)
    }

    /// Reserve units for a pending order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Inventory` if fewer units are available.
    pub async fn reserve(&self, product_id: ProductId, quantity: i32) -> Result<InventoryItem, ServiceError> {
        let item = self
            .mutate(product_id, |stock| stock.reserve(quantity))
            .await?;
        self.events
            .publish(DomainEvent::InventoryReserved { product_id, quantity });
        Ok(item)
    }

    /// Return reserved units to available stock.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Inventory` for a non-positive quantity.
    pub async fn release(&self, product_id: ProductId, quantity: i32) -> Result<InventoryItem, ServiceError> {
        let item = self
            .mutate(product_id, |stock| stock.release(quantity))
            .await?;
        self.events
            .publish(DomainEvent::InventoryReleased { product_id, quantity });
        Ok(item)
    }

    /// Ship reserved units, removing them from stock.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Inventory` if fewer units are reserved.
    pub async fn commit(&self, product_id: ProductId, quantity: i32) -> Result<InventoryItem, ServiceError> {
        let item = self
            .mutate(product_id, |stock| stock.commit(quantity))
            .await?;
        self.events
            .publish(DomainEvent::InventoryCommitted { product_id, quantity });
        Ok(item)
    }

    async fn mutate<F>(&self, product_id: ProductId, apply: F) -> Result<InventoryItem, ServiceError>
    where
        F: FnOnce(&mut StockLevel) -> Result<(), InventoryError>,
    {
        let mut tx = self.pool.begin().await?;
        let mut item = InventoryRepository::lock(&mut tx, product_id)
            .await
            .or_not_found("inventory item")?;
        apply(&mut item.stock)?;
        let item = InventoryRepository::save_stock(&mut tx, item.id, &item.stock).await?;
        tx.commit().await?;
        Ok(item)
    }
}

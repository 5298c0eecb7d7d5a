//! Cart service.
//!
//! Each mutation locks the customer's cart row, applies the rule from
//! [`websale_core::cart`], and writes the lines back in one transaction.
//! Product name, price and image are always taken from the catalog.

use sqlx::PgPool;

use websale_core::cart::{Cart, CartError, NewCartLine};
use websale_core::{CustomerId, ProductId};

use super::ServiceError;
use super::catalog::CatalogService;
use crate::db::carts::CartRepository;
use crate::models::cart::{AddCartItemInput, StoredCart};
use crate::state::AppState;

/// Cart service.
pub struct CartService<'a> {
    pool: &'a PgPool,
    catalog: CatalogService<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self {
            pool: state.pool(),
            catalog: CatalogService::new(state),
        }
    }

    /// Get a customer's cart, creating it on first access.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    pub async fn get(&self, customer_id: CustomerId) -> Result<StoredCart, ServiceError> {
        Ok(CartRepository::new(self.pool).get_or_create(customer_id).await?)
    }

    /// Add a product, merging with an existing line for the same product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` for an unknown product,
    /// `ServiceError::Validation` for an inactive one, and
    /// `ServiceError::Cart` for a non-positive quantity or a line that
    /// would exceed the per-line limit.
    pub async fn add_item(
        &self,
        customer_id: CustomerId,
        input: AddCartItemInput,
    ) -> Result<StoredCart, ServiceError> {
        if input.quantity <= 0 {
            return Err(CartError::InvalidQuantity.into());
        }

        let product = self.catalog.get(input.product_id).await?;
        if !product.is_active {
            return Err(ServiceError::Validation(format!(
                "product {} is not available",
                product.id
            )));
        }

        let line = NewCartLine {
            product_id: product.id,
            product_image: product.primary_image().map(str::to_owned),
            product_name: product.name,
            price: product.price,
            quantity: input.quantity,
        };

        let stored = self
            .mutate(customer_id, |cart| cart.add_item(line).map(|_| ()))
            .await?;

        tracing::info!(
            customer_id = %customer_id,
            product_id = %input.product_id,
            quantity = input.quantity,
            "Item added to cart"
        );
        Ok(stored)
    }

    /// Set a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Cart` if the product is not in the cart or the
    /// quantity exceeds the per-line limit.
    pub async fn update_quantity(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<StoredCart, ServiceError> {
        self.mutate(customer_id, |cart| cart.update_quantity(product_id, quantity))
            .await
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Cart` if the product is not in the cart.
    pub async fn remove_item(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<StoredCart, ServiceError> {
        self.mutate(customer_id, |cart| cart.remove_item(product_id).map(|_| ()))
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    pub async fn clear(&self, customer_id: CustomerId) -> Result<StoredCart, ServiceError> {
        self.mutate(customer_id, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    async fn mutate<F>(&self, customer_id: CustomerId, apply: F) -> Result<StoredCart, ServiceError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>,
    {
        let mut tx = self.pool.begin().await?;
        let mut stored = CartRepository::lock(&mut tx, customer_id).await?;
        apply(&mut stored.cart)?;
        CartRepository::save(&mut tx, &mut stored).await?;
        tx.commit().await?;
        Ok(stored)
    }
}

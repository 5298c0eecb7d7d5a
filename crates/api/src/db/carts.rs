//! Cart repository.
//!
//! Carts are created lazily: the first read or write for a customer id
//! inserts an empty cart row. Mutations lock the cart row with
//! `SELECT ... FOR UPDATE` so concurrent writers for the same customer
//! serialize.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use websale_core::cart::{Cart, CartLine};
use websale_core::{CartId, CustomerId, ProductId};

use super::RepositoryError;
use crate::models::cart::StoredCart;

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    customer_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: i32,
    product_name: String,
    price: Decimal,
    quantity: i32,
    product_image: Option<String>,
}

impl From<CartItemRow> for CartLine {
    fn from(row: CartItemRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            price: row.price,
            quantity: row.quantity,
            product_image: row.product_image,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer's cart, creating an empty one on first access.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, customer_id: CustomerId) -> Result<StoredCart, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let row = ensure_cart(&mut conn, customer_id, false).await?;
        load_cart(&mut conn, row).await
    }

    /// Lock a customer's cart row for the rest of the transaction, creating
    /// it if missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn lock(
        conn: &mut PgConnection,
        customer_id: CustomerId,
    ) -> Result<StoredCart, RepositoryError> {
        let row = ensure_cart(conn, customer_id, true).await?;
        load_cart(conn, row).await
    }

    /// Persist the lines of a locked cart, replacing what was stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn save(conn: &mut PgConnection, stored: &mut StoredCart) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM websale.cart_item WHERE cart_id = $1")
            .bind(stored.id)
            .execute(&mut *conn)
            .await?;

        for (position, line) in stored.cart.lines().iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| {
                RepositoryError::DataCorruption("cart has too many lines".to_owned())
            })?;
            sqlx::query(
                "INSERT INTO websale.cart_item
                    (cart_id, product_id, product_name, price, quantity, product_image, position)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(stored.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.price)
            .bind(line.quantity)
            .bind(line.product_image.as_deref())
            .bind(position)
            .execute(&mut *conn)
            .await?;
        }

        stored.updated_at = sqlx::query_scalar(
            "UPDATE websale.cart SET updated_at = NOW() WHERE id = $1 RETURNING updated_at",
        )
        .bind(stored.id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(())
    }

    /// Empty a customer's cart inside the caller's transaction.
    ///
    /// The cart row is locked first, so the clear is ordered against
    /// concurrent [`Self::lock`] holders. A customer without a cart is left
    /// without one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn clear_for_customer(
        conn: &mut PgConnection,
        customer_id: CustomerId,
    ) -> Result<u64, RepositoryError> {
        let cart_id: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM websale.cart WHERE customer_id = $1 FOR UPDATE",
        )
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(cart_id) = cart_id else {
            return Ok(0);
        };

        let result = sqlx::query("DELETE FROM websale.cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("UPDATE websale.cart SET updated_at = NOW() WHERE id = $1")
            .bind(cart_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}

async fn ensure_cart(
    conn: &mut PgConnection,
    customer_id: CustomerId,
    for_update: bool,
) -> Result<CartRow, RepositoryError> {
    sqlx::query(
        "INSERT INTO websale.cart (customer_id) VALUES ($1)
         ON CONFLICT (customer_id) DO NOTHING",
    )
    .bind(customer_id)
    .execute(&mut *conn)
    .await?;

    let lock = if for_update { " FOR UPDATE" } else { "" };
    let row = sqlx::query_as::<_, CartRow>(&format!(
        "SELECT id, customer_id, created_at, updated_at
         FROM websale.cart WHERE customer_id = $1{lock}"
    ))
    .bind(customer_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

async fn load_cart(conn: &mut PgConnection, row: CartRow) -> Result<StoredCart, RepositoryError> {
    let items = sqlx::query_as::<_, CartItemRow>(
        "SELECT product_id, product_name, price, quantity, product_image
         FROM websale.cart_item
         WHERE cart_id = $1
         ORDER BY position, id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    let customer_id = CustomerId::new(row.customer_id);
    Ok(StoredCart {
        id: CartId::new(row.id),
        cart: Cart::from_lines(customer_id, items.into_iter().map(CartLine::from).collect()),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

//! Order repository.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use websale_core::pricing::OrderTotals;
use websale_core::{CustomerId, OrderId, OrderItemId, OrderStatus, ProductId};

use super::RepositoryError;
use crate::models::order::{Address, Order, OrderItem};

const ORDER_COLUMNS: &str = "id, order_number, customer_id, customer_name, customer_email, \
                             status, subtotal, tax_amount, shipping_cost, total_amount, \
                             shipping_address, payment_method, notes, created_at, updated_at, \
                             shipped_at, delivered_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    customer_id: i32,
    customer_name: String,
    customer_email: String,
    status: OrderStatus,
    subtotal: Decimal,
    tax_amount: Decimal,
    shipping_cost: Decimal,
    total_amount: Decimal,
    shipping_address: Json<Address>,
    payment_method: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            customer_id: CustomerId::new(self.customer_id),
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            items,
            status: self.status,
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            shipping_cost: self.shipping_cost,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address.0,
            payment_method: self.payment_method,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    sku: String,
    unit_price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            sku: row.sku,
            unit_price: row.unit_price,
            quantity: row.quantity,
            total_price: row.unit_price * Decimal::from(row.quantity),
        }
    }
}

/// A priced line to persist with a new order.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Everything needed to insert an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub customer_email: String,
    pub lines: Vec<NewOrderLine>,
    pub totals: OrderTotals,
    pub shipping_address: Address,
    pub payment_method: String,
    pub notes: String,
}

/// Format an order number, `ORD-YYYYMMDD-NNNN`.
#[must_use]
pub fn format_order_number(day: NaiveDate, sequence: i32) -> String {
    format!("ORD-{}-{sequence:04}", day.format("%Y%m%d"))
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn create(conn: &mut PgConnection, new: &NewOrder) -> Result<Order, RepositoryError> {
        let (day, sequence): (NaiveDate, i32) = sqlx::query_as(
            "INSERT INTO websale.order_number_counter (day, last_value)
             VALUES (CURRENT_DATE, 1)
             ON CONFLICT (day)
             DO UPDATE SET last_value = websale.order_number_counter.last_value + 1
             RETURNING day, last_value",
        )
        .fetch_one(&mut *conn)
        .await?;
        let order_number = format_order_number(day, sequence);

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO websale.customer_order
                (order_number, customer_id, customer_name, customer_email, subtotal,
                 tax_amount, shipping_cost, total_amount, shipping_address,
                 payment_method, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&order_number)
        .bind(new.customer_id)
        .bind(&new.customer_name)
        .bind(&new.customer_email)
        .bind(new.totals.subtotal)
        .bind(new.totals.tax_amount)
        .bind(new.totals.shipping_cost)
        .bind(new.totals.total_amount)
        .bind(Json(&new.shipping_address))
        .bind(&new.payment_method)
        .bind(&new.notes)
        .fetch_one(&mut *conn)
        .await?;

        let mut items = Vec::with_capacity(new.lines.len());
        for line in &new.lines {
            let item = sqlx::query_as::<_, OrderItemRow>(
                "INSERT INTO websale.order_item
                    (order_id, product_id, product_name, sku, unit_price, quantity)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id, order_id, product_id, product_name, sku, unit_price, quantity",
            )
            .bind(row.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(&line.sku)
            .bind(line.unit_price)
            .bind(line.quantity)
            .fetch_one(&mut *conn)
            .await?;
            items.push(OrderItem::from(item));
        }

        Ok(row.into_order(items))
    }

    /// Get an order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM websale.customer_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut orders = attach_items(self.pool, vec![row]).await?;
                Ok(orders.pop())
            }
            None => Ok(None),
        }
    }

    /// List orders, newest first, optionally filtered by status and customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        customer_id: Option<CustomerId>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM websale.customer_order
             WHERE ($1::websale.order_status IS NULL OR status = $1)
               AND ($2::int IS NULL OR customer_id = $2)
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(status)
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        attach_items(self.pool, rows).await
    }

    /// Lock an order row and return its current status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn lock_status(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<OrderStatus, RepositoryError> {
        sqlx::query_scalar("SELECT status FROM websale.customer_order WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Write a new status, stamping `shipped_at` / `delivered_at` when the
    /// order reaches those stages. `notes` replaces the stored notes when given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: OrderId,
        status: OrderStatus,
        notes: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE websale.customer_order
             SET status = $2,
                 notes = COALESCE($3, notes),
                 shipped_at = CASE WHEN $4 THEN NOW() ELSE shipped_at END,
                 delivered_at = CASE WHEN $5 THEN NOW() ELSE delivered_at END
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .bind(status == OrderStatus::Shipped)
        .bind(status == OrderStatus::Delivered)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Load the items of `rows` in one query and assemble full orders,
/// preserving row order.
async fn attach_items(pool: &PgPool, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let item_rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, product_id, product_name, sku, unit_price, quantity
         FROM websale.order_item
         WHERE order_id = ANY($1)
         ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in item_rows {
        by_order.entry(item.order_id).or_default().push(item.into());
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let items = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_order_number() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_order_number(day, 1), "ORD-20260307-0001");
        assert_eq!(format_order_number(day, 1234), "ORD-20260307-1234");
        assert_eq!(format_order_number(day, 12345), "ORD-20260307-12345");
    }
}

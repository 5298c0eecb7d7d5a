//! Orders service.
//!
//! Checkout prices every line from the catalog, computes totals with the
//! configured [`PricingPolicy`], stores the order and empties the
//! customer's cart in one transaction.

use sqlx::PgPool;

use websale_core::cart::MAX_LINE_QUANTITY;
use websale_core::events::DomainEvent;
use websale_core::pricing::{OrderTotals, PricedLine, PricingPolicy};
use websale_core::{CustomerId, OrderId, OrderStatus};

use super::catalog::CatalogService;
use super::events::EventBus;
use super::validation::{MAX_MONEY, Validator};
use super::{OrNotFound, ServiceError};
use crate::db::carts::CartRepository;
use crate::db::customers::CustomerRepository;
use crate::db::orders::{NewOrder, NewOrderLine, OrderRepository};
use crate::models::StatusUpdate;
use crate::models::order::{CreateOrderInput, Order, OrderFilter, OrderItemInput};
use crate::state::AppState;

/// Validate the shape of an order request before touching the database.
///
/// Quantity limits apply to the merged line of each product.
///
/// # Errors
///
/// Returns `ServiceError::Validation` listing every failed rule.
pub fn validate_order(input: &CreateOrderInput) -> Result<(), ServiceError> {
    let mut v = Validator::new();
    v.check(!input.items.is_empty(), "order must contain at least one item")
        .length("paymentMethod", &input.payment_method, 1, 50)
        .length("notes", &input.notes, 0, 1000);
    for item in &input.items {
        v.check(
            item.quantity > 0,
            format!("quantity for product {} must be greater than 0", item.product_id),
        );
    }
    if input.items.iter().all(|item| item.quantity > 0) {
        for item in merge_items(&input.items) {
            v.check(
                item.quantity <= MAX_LINE_QUANTITY,
                format!(
                    "quantity for product {} cannot exceed {MAX_LINE_QUANTITY}",
                    item.product_id
                ),
            );
        }
    }
    v.finish()
}

/// Collapse repeated products into one line each, summing quantities and
/// keeping first-seen order. Sums saturate so oversized totals still fail
/// validation.
#[must_use]
pub fn merge_items(items: &[OrderItemInput]) -> Vec<OrderItemInput> {
    let mut merged: Vec<OrderItemInput> = Vec::with_capacity(items.len());
    for item in items {
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(*item),
        }
    }
    merged
}

/// The stored totals must fit their `NUMERIC(12, 2)` columns.
fn check_totals(totals: &OrderTotals) -> Result<(), ServiceError> {
    Validator::new()
        .check(
            totals.total_amount <= MAX_MONEY,
            format!("order total cannot exceed {MAX_MONEY}"),
        )
        .finish()
}

fn non_blank_notes(notes: Option<&str>) -> Option<&str> {
    notes.map(str::trim).filter(|n| !n.is_empty())
}

/// Orders service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    orders: OrderRepository<'a>,
    customers: CustomerRepository<'a>,
    catalog: CatalogService<'a>,
    pricing: &'a PricingPolicy,
    events: &'a EventBus,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self {
            pool: state.pool(),
            orders: OrderRepository::new(state.pool()),
            customers: CustomerRepository::new(state.pool()),
            catalog: CatalogService::new(state),
            pricing: &state.config().pricing,
            events: state.events(),
        }
    }

    /// Place an order.
    ///
    /// Customer name and email default to the customer's account when not
    /// supplied.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for an empty or malformed request,
    /// `ServiceError::NotFound` for an unknown product or customer.
    pub async fn create(&self, input: CreateOrderInput) -> Result<Order, ServiceError> {
        validate_order(&input)?;

        let (customer_name, customer_email) = self.resolve_contact(&input).await?;
        let lines = self.price_lines(&merge_items(&input.items)).await?;

        let priced: Vec<PricedLine> = lines
            .iter()
            .map(|l| PricedLine {
                unit_price: l.unit_price,
                quantity: l.quantity,
            })
            .collect();
        let totals = OrderTotals::compute(&priced, self.pricing);
        check_totals(&totals)?;

        let new = NewOrder {
            customer_id: input.customer_id,
            customer_name,
            customer_email,
            lines,
            totals,
            shipping_address: input.shipping_address,
            payment_method: input.payment_method.trim().to_owned(),
            notes: input.notes,
        };

        let mut tx = self.pool.begin().await?;
        let order = OrderRepository::create(&mut tx, &new).await?;
        let cleared = CartRepository::clear_for_customer(&mut tx, order.customer_id).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            customer_id = %order.customer_id,
            total = %order.total_amount,
            cart_lines_cleared = cleared,
            "Order created"
        );
        self.events.publish(DomainEvent::OrderCreated {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_id: order.customer_id,
            total_amount: order.total_amount,
        });
        Ok(order)
    }

    /// List orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Status` for an unknown status filter.
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, ServiceError> {
        let status = filter
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<OrderStatus>)
            .transpose()?;

        Ok(self.orders.list(status, filter.customer_id).await?)
    }

    /// Orders of one customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    pub async fn list_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, ServiceError> {
        Ok(self.orders.list(None, Some(customer_id)).await?)
    }

    /// Get an order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the order does not exist.
    pub async fn get(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.orders.get_by_id(id).await?.or_not_found("order")
    }

    /// Move an order to a new status. Blank notes leave the stored notes
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Status` for an unknown status or an illegal
    /// transition, `ServiceError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        update: StatusUpdate,
    ) -> Result<Order, ServiceError> {
        let target: OrderStatus = update.status.trim().parse()?;
        let notes = non_blank_notes(update.notes.as_deref());

        let mut tx = self.pool.begin().await?;
        let from = OrderRepository::lock_status(&mut tx, id)
            .await
            .or_not_found("order")?;
        let to = from.transition_to(target)?;
        OrderRepository::set_status(&mut tx, id, to, notes)
            .await
            .or_not_found("order")?;
        tx.commit().await?;

        tracing::info!(order_id = %id, %from, %to, "Order status changed");
        self.events
            .publish(DomainEvent::OrderStatusChanged { order_id: id, from, to });

        self.get(id).await
    }

    async fn resolve_contact(&self, input: &CreateOrderInput) -> Result<(String, String), ServiceError> {
        let name = input
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let email = input
            .customer_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if let (Some(name), Some(email)) = (name, email) {
            return Ok((name.to_owned(), email.to_owned()));
        }

        let customer = self
            .customers
            .get_by_id(input.customer_id)
            .await?
            .or_not_found("customer")?;

        Ok((
            name.map_or_else(|| customer.full_name(), str::to_owned),
            email.map_or_else(|| customer.email.to_string(), str::to_owned),
        ))
    }

    async fn price_lines(&self, items: &[OrderItemInput]) -> Result<Vec<NewOrderLine>, ServiceError> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self.catalog.get(item.product_id).await?;
            if !product.is_active {
                return Err(ServiceError::Validation(format!(
                    "product {} is not available",
                    product.id
                )));
            }
            lines.push(NewOrderLine {
                product_id: product.id,
                product_name: product.name,
                sku: product.sku,
                unit_price: product.price,
                quantity: item.quantity,
            });
        }
        Ok(lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use websale_core::ProductId;

    use super::*;

    fn input(items: serde_json::Value) -> CreateOrderInput {
        serde_json::from_value(serde_json::json!({
            "customerId": 1,
            "items": items,
        }))
        .unwrap()
    }

    #[test]
    fn test_order_needs_items() {
        let Err(ServiceError::Validation(msg)) = validate_order(&input(serde_json::json!([]))) else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "order must contain at least one item");
    }

    #[test]
    fn test_order_item_quantities_must_be_positive() {
        let order = input(serde_json::json!([
            {"productId": 1, "quantity": 2},
            {"productId": 7, "quantity": 0},
        ]));
        let Err(ServiceError::Validation(msg)) = validate_order(&order) else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "quantity for product 7 must be greater than 0");
    }

    #[test]
    fn test_valid_order_passes() {
        let order = input(serde_json::json!([{"productId": 1, "quantity": 1}]));
        assert!(validate_order(&order).is_ok());
    }

    #[test]
    fn test_order_item_quantities_are_capped() {
        let order = input(serde_json::json!([{"productId": 3, "quantity": i32::MAX}]));
        let Err(ServiceError::Validation(msg)) = validate_order(&order) else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "quantity for product 3 cannot exceed 10000");

        let split = input(serde_json::json!([
            {"productId": 3, "quantity": 6000},
            {"productId": 3, "quantity": 6000},
        ]));
        assert!(validate_order(&split).is_err());

        let at_limit = input(serde_json::json!([{"productId": 3, "quantity": 10000}]));
        assert!(validate_order(&at_limit).is_ok());
    }

    #[test]
    fn test_repeated_products_merge_into_one_line() {
        let order = input(serde_json::json!([
            {"productId": 4, "quantity": 2},
            {"productId": 9, "quantity": 1},
            {"productId": 4, "quantity": 3},
        ]));
        let merged = merge_items(&order.items);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].product_id, ProductId::new(4));
        assert_eq!(merged[0].quantity, 5);
        assert_eq!(merged[1].product_id, ProductId::new(9));
        assert_eq!(merged[1].quantity, 1);
    }

    #[test]
    fn test_order_total_must_fit_the_money_column() {
        let policy = PricingPolicy::default();
        let fits = OrderTotals::compute(
            &[PricedLine { unit_price: Decimal::new(4990, 2), quantity: 10_000 }],
            &policy,
        );
        assert!(check_totals(&fits).is_ok());

        // The catalog maximum plus 18% tax no longer fits.
        let overflows = OrderTotals::compute(
            &[PricedLine { unit_price: MAX_MONEY, quantity: 1 }],
            &policy,
        );
        let Err(ServiceError::Validation(msg)) = check_totals(&overflows) else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "order total cannot exceed 9999999999.99");
    }

    #[test]
    fn test_blank_notes_are_ignored() {
        assert_eq!(non_blank_notes(Some("Left at the door ")), Some("Left at the door"));
        assert_eq!(non_blank_notes(Some("")), None);
        assert_eq!(non_blank_notes(Some("   ")), None);
        assert_eq!(non_blank_notes(None), None);
    }
}

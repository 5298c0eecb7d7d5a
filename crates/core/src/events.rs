//! Domain events emitted after successful state changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CustomerId, OrderId, OrderStatus, ProductId};

/// Something that happened in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ProductCreated {
        product_id: ProductId,
        sku: String,
    },
    ProductUpdated {
        product_id: ProductId,
    },
    ProductDeleted {
        product_id: ProductId,
    },
    OrderCreated {
        order_id: OrderId,
        order_number: String,
        customer_id: CustomerId,
        total_amount: Decimal,
    },
    OrderStatusChanged {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
    InventoryAdjusted {
        product_id: ProductId,
        delta: i32,
        quantity: i32,
    },
    InventoryReserved {
        product_id: ProductId,
        quantity: i32,
    },
    InventoryReleased {
        product_id: ProductId,
        quantity: i32,
    },
    InventoryCommitted {
        product_id: ProductId,
        quantity: i32,
    },
    CustomerRegistered {
        customer_id: CustomerId,
        email: String,
    },
    PaymentProcessed {
        payment_id: String,
        order_id: Option<OrderId>,
    },
    ShipmentCreated {
        shipping_id: String,
        order_id: Option<OrderId>,
    },
}

impl DomainEvent {
    /// Dotted event name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProductCreated { .. } => "product.created",
            Self::ProductUpdated { .. } => "product.updated",
            Self::ProductDeleted { .. } => "product.deleted",
            Self::OrderCreated { .. } => "order.created",
            Self::OrderStatusChanged { .. } => "order.status_changed",
            Self::InventoryAdjusted { .. } => "inventory.adjusted",
            Self::InventoryReserved { .. } => "inventory.reserved",
            Self::InventoryReleased { .. } => "inventory.released",
            Self::InventoryCommitted { .. } => "inventory.committed",
            Self::CustomerRegistered { .. } => "customer.registered",
            Self::PaymentProcessed { .. } => "payment.processed",
            Self::ShipmentCreated { .. } => "shipment.created",
        }
    }
}

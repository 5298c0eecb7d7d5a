//! Order total calculation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Tax and shipping rules applied when an order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax (0.18 = 18%).
    pub tax_rate: Decimal,
    /// Orders with a subtotal strictly above this ship for free.
    pub free_shipping_threshold: Decimal,
    pub shipping_fee: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(18, 2),
            free_shipping_threshold: Decimal::new(100, 0),
            shipping_fee: Decimal::new(15, 0),
        }
    }
}

/// A priced line fed into [`OrderTotals::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl PricedLine {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Monetary breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub total_amount: Decimal,
}

impl OrderTotals {
    /// Compute totals for `lines` under `policy`.
    ///
    /// Tax is rounded half away from zero to two decimal places. An order
    /// with no lines costs nothing, including shipping.
    #[must_use]
    pub fn compute(lines: &[PricedLine], policy: &PricingPolicy) -> Self {
        let subtotal: Decimal = lines.iter().map(PricedLine::total).sum();

        let tax_amount = (subtotal * policy.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let shipping_cost = if lines.is_empty() || subtotal > policy.free_shipping_threshold {
            Decimal::ZERO
        } else {
            policy.shipping_fee
        };

        Self {
            subtotal,
            tax_amount,
            shipping_cost,
            total_amount: subtotal + tax_amount + shipping_cost,
        }
    }
}

//! Dashboard statistics.

use rust_decimal::Decimal;
use serde::Serialize;

/// Store-wide counters for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    /// Distinct customers that have placed at least one order.
    pub total_customers: i64,
    /// Sum of totals over orders that are not cancelled.
    pub total_revenue: Decimal,
    /// Orders placed in the last seven days.
    pub orders_growth: i64,
}

//! Aggregate queries for the dashboard.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::dashboard::DashboardStats;

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_products: i64,
    total_orders: i64,
    total_customers: i64,
    total_revenue: Decimal,
    orders_growth: i64,
}

/// Compute store-wide statistics in a single round trip.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn stats(pool: &PgPool) -> Result<DashboardStats, RepositoryError> {
    let row = sqlx::query_as::<_, StatsRow>(
        "SELECT
            (SELECT COUNT(*) FROM websale.product) AS total_products,
            (SELECT COUNT(*) FROM websale.customer_order) AS total_orders,
            (SELECT COUNT(DISTINCT customer_id) FROM websale.customer_order) AS total_customers,
            (SELECT COALESCE(SUM(total_amount), 0)
               FROM websale.customer_order
              WHERE status <> 'cancelled') AS total_revenue,
            (SELECT COUNT(*)
               FROM websale.customer_order
              WHERE created_at >= NOW() - INTERVAL '7 days') AS orders_growth",
    )
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total_products: row.total_products,
        total_orders: row.total_orders,
        total_customers: row.total_customers,
        total_revenue: row.total_revenue,
        orders_growth: row.orders_growth,
    })
}

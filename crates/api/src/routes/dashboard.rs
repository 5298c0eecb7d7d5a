//! Dashboard statistics.

use axum::extract::State;

use crate::db;
use crate::error::Result;
use crate::extract::Json;
use crate::models::dashboard::DashboardStats;
use crate::state::AppState;

/// `GET /api/dashboard/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    Ok(Json(db::dashboard::stats(state.pool()).await?))
}

//! Order route handlers.

use axum::{extract::State, http::StatusCode};

use websale_core::OrderId;

use crate::error::Result;
use crate::extract::{Json, Path, Query};
use crate::models::StatusUpdate;
use crate::models::order::{CreateOrderInput, Order, OrderFilter, OrderList};
use crate::services::orders::OrderService;
use crate::state::AppState;

/// `GET /api/orders`
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<OrderList>> {
    let orders = OrderService::new(&state).list(filter).await?;
    Ok(Json(orders.into()))
}

/// `POST /api/orders`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = OrderService::new(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders/{id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    Ok(Json(OrderService::new(&state).get(id).await?))
}

/// `PUT /api/orders/{id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    Ok(Json(OrderService::new(&state).update_status(id, update).await?))
}

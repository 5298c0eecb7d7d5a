//! Inventory route handlers, keyed by product id.

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use websale_core::ProductId;

use crate::error::Result;
use crate::extract::{Json, Path};
use crate::models::inventory::{AdjustInput, CreateInventoryInput, InventoryItemView, QuantityInput};
use crate::services::inventory::InventoryService;
use crate::state::AppState;

/// Response body for the low-stock report.
#[derive(Debug, Serialize)]
pub struct LowStockResponse {
    pub items: Vec<InventoryItemView>,
}

/// `POST /api/inventory`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryInput>,
) -> Result<(StatusCode, Json<InventoryItemView>)> {
    let item = InventoryService::new(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// `GET /api/inventory/low-stock`
pub async fn low_stock(State(state): State<AppState>) -> Result<Json<LowStockResponse>> {
    let items = InventoryService::new(&state).low_stock().await?;
    Ok(Json(LowStockResponse {
        items: items.into_iter().map(InventoryItemView::from).collect(),
    }))
}

/// `GET /api/inventory/{product_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<InventoryItemView>> {
    let item = InventoryService::new(&state).get(product_id).await?;
    Ok(Json(item.into()))
}

/// `POST /api/inventory/{product_id}/adjust`
pub async fn adjust(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(input): Json<AdjustInput>,
) -> Result<Json<InventoryItemView>> {
    let item = InventoryService::new(&state)
        .adjust(product_id, input.quantity, &input.reason)
        .await?;
    Ok(Json(item.into()))
}

/// `POST /api/inventory/{product_id}/reserve`
pub async fn reserve(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(input): Json<QuantityInput>,
) -> Result<Json<InventoryItemView>> {
    let item = InventoryService::new(&state)
        .reserve(product_id, input.quantity)
        .await?;
    Ok(Json(item.into()))
}

/// `POST /api/inventory/{product_id}/release`
pub async fn release(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(input): Json<QuantityInput>,
) -> Result<Json<InventoryItemView>> {
    let item = InventoryService::new(&state)
        .release(product_id, input.quantity)
        .await?;
    Ok(Json(item.into()))
}

/// `POST /api/inventory/{product_id}/commit`
pub async fn commit(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(input): Json<QuantityInput>,
) -> Result<Json<InventoryItemView>> {
    let item = InventoryService::new(&state)
        .commit(product_id, input.quantity)
        .await?;
    Ok(Json(item.into()))
}

//! Cart route handlers.
//!
//! Carts are addressed by customer id and created on first access.

use axum::extract::State;

use websale_core::{CustomerId, ProductId};

use crate::error::Result;
use crate::extract::{Json, Path};
use crate::models::cart::{AddCartItemInput, CartView, UpdateCartItemInput};
use crate::services::carts::CartService;
use crate::state::AppState;

/// `GET /api/cart/{customer_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(&state).get(customer_id).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /api/cart/{customer_id}/items`
pub async fn add_item(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Json(input): Json<AddCartItemInput>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(&state).add_item(customer_id, input).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `PUT /api/cart/{customer_id}/items/{product_id}`
pub async fn update_item(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(CustomerId, ProductId)>,
    Json(input): Json<UpdateCartItemInput>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(&state)
        .update_quantity(customer_id, product_id, input.quantity)
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// `DELETE /api/cart/{customer_id}/items/{product_id}`
pub async fn remove_item(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(CustomerId, ProductId)>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(&state)
        .remove_item(customer_id, product_id)
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// `DELETE /api/cart/{customer_id}`
pub async fn clear(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(&state).clear(customer_id).await?;
    Ok(Json(CartView::from(&cart)))
}

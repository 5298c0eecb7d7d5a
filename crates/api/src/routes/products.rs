//! Catalog route handlers.

use axum::{extract::State, http::StatusCode};

use websale_core::ProductId;

use crate::error::Result;
use crate::extract::{Json, Path, Query};
use crate::models::MessageResponse;
use crate::models::product::{CreateProductInput, Product, ProductFilter, ProductPage, UpdateProductInput};
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// `GET /api/products`
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<ProductPage>> {
    Ok(Json(CatalogService::new(&state).list(filter).await?))
}

/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(CatalogService::new(&state).get(id).await?))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>> {
    Ok(Json(CatalogService::new(&state).update(id, input).await?))
}

/// `DELETE /api/products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let product = CatalogService::new(&state).delete(id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Product {} deleted",
        product.sku
    ))))
}

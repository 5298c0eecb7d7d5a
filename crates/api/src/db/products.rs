//! Product repository.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use websale_core::ProductId;

use super::{RepositoryError, conflict_on_unique, like_pattern};
use crate::models::product::{CreateProductInput, Product};

const SKU_CONFLICT: &str = "a product with this SKU already exists";

const PRODUCT_COLUMNS: &str = "id, name, description, price, sku, category, brand, images, \
                               attributes, is_active, created_at, updated_at";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    sku: String,
    category: String,
    brand: String,
    images: Vec<String>,
    attributes: Json<BTreeMap<String, String>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            sku: row.sku,
            category: row.category,
            brand: row.brand,
            images: row.images,
            attributes: row.attributes.0,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Normalized listing query.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search_term: Option<String>,
    pub is_active: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

const FILTER_CLAUSE: &str = "WHERE ($1::text IS NULL OR LOWER(category) = LOWER($1))
      AND ($2::text IS NULL OR name ILIKE $2 OR description ILIKE $2
           OR sku ILIKE $2 OR brand ILIKE $2)
      AND ($3::bool IS NULL OR is_active = $3)";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of products matching `query`, ordered by id, together
    /// with the total number of matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, query: &ProductQuery) -> Result<(Vec<Product>, i64), RepositoryError> {
        let pattern = query.search_term.as_deref().map(like_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM websale.product {FILTER_CLAUSE}"
        ))
        .bind(query.category.as_deref())
        .bind(pattern.as_deref())
        .bind(query.is_active)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM websale.product {FILTER_CLAUSE}
             ORDER BY id
             LIMIT $4 OFFSET $5"
        ))
        .bind(query.category.as_deref())
        .bind(pattern.as_deref())
        .bind(query.is_active)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(self.pool)
        .await?;

        Ok((rows.into_iter().map(Product::from).collect(), total))
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM websale.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU is taken.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO websale.product
                (name, description, price, sku, category, brand, images, attributes, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.sku)
        .bind(&input.category)
        .bind(&input.brand)
        .bind(&input.images)
        .bind(Json(&input.attributes))
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, SKU_CONFLICT))?;

        Ok(row.into())
    }

    /// Replace every field of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist and
    /// `RepositoryError::Conflict` if the new SKU is taken.
    pub async fn update(
        &self,
        id: ProductId,
        input: &CreateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE websale.product
             SET name = $2, description = $3, price = $4, sku = $5, category = $6,
                 brand = $7, images = $8, attributes = $9, is_active = $10
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.sku)
        .bind(&input.category)
        .bind(&input.brand)
        .bind(&input.images)
        .bind(Json(&input.attributes))
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, SKU_CONFLICT))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM websale.product WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete every product. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM websale.product")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM websale.product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

//! Catalog service.
//!
//! Products are cached by id with `moka` (5-minute TTL). Writes go straight
//! to the database and invalidate the cached entry.

use std::time::Duration;

use moka::future::Cache;

use websale_core::ProductId;
use websale_core::events::DomainEvent;

use super::events::EventBus;
use super::validation::{self, Validator};
use super::{OrNotFound, ServiceError};
use crate::db::products::{ProductQuery, ProductRepository};
use crate::models::product::{
    CreateProductInput, Product, ProductFilter, ProductPage, UpdateProductInput,
};
use crate::state::AppState;

/// Cache of products by id.
pub type ProductCache = Cache<ProductId, Product>;

/// Build the product cache: at most 1000 entries, each living 5 minutes.
#[must_use]
pub fn new_product_cache() -> ProductCache {
    Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300))
        .build()
}

/// Validate a full product input.
///
/// # Errors
///
/// Returns `ServiceError::Validation` listing every failed rule.
pub fn validate_product(input: &CreateProductInput) -> Result<(), ServiceError> {
    let mut v = Validator::new();
    v.length("name", &input.name, 1, 200)
        .length("description", &input.description, 1, 2000)
        .positive("price", input.price)
        .money("price", input.price)
        .sku(&input.sku)
        .length("category", &input.category, 1, 100)
        .length("brand", &input.brand, 1, 100);
    for image in &input.images {
        v.image_url(image);
    }
    v.finish()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    cache: &'a ProductCache,
    events: &'a EventBus,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self {
            products: ProductRepository::new(state.pool()),
            cache: state.product_cache(),
            events: state.events(),
        }
    }

    /// List one page of products.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for out-of-range paging.
    pub async fn list(&self, filter: ProductFilter) -> Result<ProductPage, ServiceError> {
        let (page, page_size) = validation::pagination(filter.page, filter.page_size)?;
        let query = ProductQuery {
            category: non_blank(filter.category),
            search_term: non_blank(filter.search_term),
            is_active: filter.is_active,
            limit: page_size,
            offset: (page - 1).saturating_mul(page_size),
        };

        let (products, total) = self.products.list(&query).await?;
        Ok(ProductPage::new(products, total, page, page_size))
    }

    /// Get a product, serving from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, ServiceError> {
        if let Some(product) = self.cache.get(&id).await {
            return Ok(product);
        }

        let product = self.products.get_by_id(id).await?.or_not_found("product")?;
        self.cache.insert(id, product.clone()).await;
        Ok(product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for invalid input and
    /// `ServiceError::Conflict` if the SKU is taken.
    pub async fn create(&self, input: CreateProductInput) -> Result<Product, ServiceError> {
        validate_product(&input)?;
        let product = self.products.create(&input).await?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");
        self.cache.insert(product.id, product.clone()).await;
        self.events.publish(DomainEvent::ProductCreated {
            product_id: product.id,
            sku: product.sku.clone(),
        });
        Ok(product)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound`, `ServiceError::Validation`, or
    /// `ServiceError::Conflict` for a taken SKU.
    pub async fn update(
        &self,
        id: ProductId,
        input: UpdateProductInput,
    ) -> Result<Product, ServiceError> {
        // Merge against the stored row, never a cached copy.
        let current = self.products.get_by_id(id).await?.or_not_found("product")?;
        let merged = input.merge_into(current);
        validate_product(&merged)?;

        let product = self
            .products
            .update(id, &merged)
            .await
            .or_not_found("product")?;

        tracing::info!(product_id = %id, "Product updated");
        self.cache.invalidate(&id).await;
        self.events.publish(DomainEvent::ProductUpdated { product_id: id });
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<Product, ServiceError> {
        let product = self.products.delete(id).await.or_not_found("product")?;

        tracing::info!(product_id = %id, sku = %product.sku, "Product deleted");
        self.cache.invalidate(&id).await;
        self.events.publish(DomainEvent::ProductDeleted { product_id: id });
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use super::*;

    fn input() -> CreateProductInput {
        CreateProductInput {
            name: "Kettle".to_string(),
            description: "Stainless steel kettle".to_string(),
            price: Decimal::new(4990, 2),
            sku: "KTL-001".to_string(),
            category: "Kitchen".to_string(),
            brand: "Brewline".to_string(),
            images: vec!["https://cdn.websale.example/ktl.jpg".to_string()],
            attributes: BTreeMap::new(),
            is_active: true,
        }
    }

    #[test]
    fn test_valid_product_passes() {
        assert!(validate_product(&input()).is_ok());
    }

    #[test]
    fn test_invalid_product_reports_each_field() {
        let bad = CreateProductInput {
            name: String::new(),
            price: Decimal::ZERO,
            sku: "ktl 1".to_string(),
            images: vec!["/relative.jpg".to_string()],
            ..input()
        };

        let Err(ServiceError::Validation(msg)) = validate_product(&bad) else {
            panic!("expected validation error");
        };
        assert!(msg.contains("name must be 1-200 characters"));
        assert!(msg.contains("price must be greater than 0"));
        assert!(msg.contains("sku may only contain"));
        assert!(msg.contains("invalid image URL: /relative.jpg"));
        assert!(!msg.contains("brand"));
    }

    #[test]
    fn test_price_must_fit_the_money_column() {
        let too_precise = CreateProductInput {
            price: "12.345".parse().unwrap(),
            ..input()
        };
        let Err(ServiceError::Validation(msg)) = validate_product(&too_precise) else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "price cannot have more than 2 decimal places");

        let too_large = CreateProductInput {
            price: "99999999999.999".parse().unwrap(),
            ..input()
        };
        let Err(ServiceError::Validation(msg)) = validate_product(&too_large) else {
            panic!("expected validation error");
        };
        assert!(msg.contains("price cannot exceed 9999999999.99"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Kitchen ".to_string())), Some("Kitchen".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[tokio::test]
    async fn test_product_cache_round_trip() {
        let cache = new_product_cache();
        let product = Product {
            id: ProductId::new(9),
            name: "Kettle".to_string(),
            description: "Stainless steel kettle".to_string(),
            price: Decimal::new(4990, 2),
            sku: "KTL-001".to_string(),
            category: "Kitchen".to_string(),
            brand: "Brewline".to_string(),
            images: Vec::new(),
            attributes: BTreeMap::new(),
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        cache.insert(product.id, product.clone()).await;
        assert_eq!(cache.get(&product.id).await, Some(product.clone()));

        cache.invalidate(&product.id).await;
        assert_eq!(cache.get(&product.id).await, None);
    }
}

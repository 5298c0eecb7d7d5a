//! Catalog product models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use websale_core::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sku: String,
    pub category: String,
    pub brand: String,
    /// Absolute image URLs, first one is the primary image.
    pub images: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

const fn default_true() -> bool {
    true
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sku: String,
    pub category: String,
    pub brand: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial product update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub images: Option<Vec<String>>,
    pub attributes: Option<BTreeMap<String, String>>,
    pub is_active: Option<bool>,
}

impl UpdateProductInput {
    /// Apply the present fields to `product`, producing the full
    /// replacement input that gets validated and persisted.
    #[must_use]
    pub fn merge_into(self, product: Product) -> CreateProductInput {
        CreateProductInput {
            name: self.name.unwrap_or(product.name),
            description: self.description.unwrap_or(product.description),
            price: self.price.unwrap_or(product.price),
            sku: self.sku.unwrap_or(product.sku),
            category: self.category.unwrap_or(product.category),
            brand: self.brand.unwrap_or(product.brand),
            images: self.images.unwrap_or(product.images),
            attributes: self.attributes.unwrap_or(product.attributes),
            is_active: self.is_active.unwrap_or(product.is_active),
        }
    }
}

/// Query parameters for product listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search_term: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One page of products.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl ProductPage {
    #[must_use]
    pub const fn new(products: Vec<Product>, total_count: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + page_size - 1) / page_size
        };
        Self {
            products,
            total_count,
            page_size,
            current_page: page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Kettle".to_string(),
            description: "Stainless steel kettle".to_string(),
            price: Decimal::new(4990, 2),
            sku: "KTL-001".to_string(),
            category: "Kitchen".to_string(),
            brand: "Brewline".to_string(),
            images: vec!["https://cdn.websale.example/ktl.jpg".to_string()],
            attributes: BTreeMap::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let update = UpdateProductInput {
            price: Some(Decimal::new(3990, 2)),
            is_active: Some(false),
            ..UpdateProductInput::default()
        };
        let merged = update.merge_into(product());
        assert_eq!(merged.name, "Kettle");
        assert_eq!(merged.sku, "KTL-001");
        assert_eq!(merged.price, Decimal::new(3990, 2));
        assert!(!merged.is_active);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(ProductPage::new(Vec::new(), 0, 1, 20).total_pages, 0);
        assert_eq!(ProductPage::new(Vec::new(), 20, 1, 20).total_pages, 1);
        assert_eq!(ProductPage::new(Vec::new(), 21, 1, 20).total_pages, 2);
    }

    #[test]
    fn test_serializes_camel_case_with_string_price() {
        let json = serde_json::to_value(product()).unwrap_or_default();
        assert_eq!(json["price"], "49.90");
        assert_eq!(json["isActive"], true);
        assert!(json.get("createdAt").is_some());
    }
}

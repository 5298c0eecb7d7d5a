//! Seed the catalog from a JSON file.
//!
//! The file holds an array of products in the API's camelCase shape:
//!
//! ```json
//! [
//!   {
//!     "name": "Trail Runner",
//!     "description": "Lightweight trail running shoe",
//!     "price": "89.99",
//!     "sku": "SHOE-TR-01",
//!     "category": "Footwear",
//!     "brand": "Summit",
//!     "images": ["https://cdn.example.com/tr-01.jpg"],
//!     "attributes": {"color": "blue"},
//!     "isActive": true
//!   }
//! ]
//! ```
//!
//! Every entry is validated before the database is touched. Products whose
//! SKU already exists are skipped.

use std::path::Path;

use secrecy::SecretString;
use thiserror::Error;
use tracing::{error, info, warn};

use websale_api::db::{self, RepositoryError, products::ProductRepository};
use websale_api::models::product::CreateProductInput;
use websale_api::services::catalog::validate_product;

use crate::MissingDatabaseUrl;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Config(#[from] MissingDatabaseUrl),

    #[error("Failed to read {0}: {1}")]
    Read(String, std::io::Error),

    #[error("Invalid products file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} invalid products, nothing imported")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Outcome of a product import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub deleted: u64,
}

/// Parse and validate a products file.
///
/// Invalid entries are logged with their index and SKU.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed JSON and `SeedError::Invalid`
/// when any entry fails validation.
pub fn parse_products(content: &str) -> Result<Vec<CreateProductInput>, SeedError> {
    let products: Vec<CreateProductInput> = serde_json::from_str(content)?;

    let mut invalid = 0;
    for (index, product) in products.iter().enumerate() {
        if let Err(e) = validate_product(product) {
            error!(index, sku = %product.sku, "{e}");
            invalid += 1;
        }
    }

    if invalid > 0 {
        return Err(SeedError::Invalid(invalid));
    }
    Ok(products)
}

/// Import products from `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or if the
/// database fails.
pub async fn products(file: &Path, replace: bool) -> Result<(), SeedError> {
    let database_url = crate::database_url()?;

    info!(path = %file.display(), "Loading products from file");
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| SeedError::Read(file.display().to_string(), e))?;
    let products = parse_products(&content)?;
    info!(count = products.len(), "Products validated");

    let summary = import(&database_url, &products, replace).await?;

    info!("Seeding complete!");
    info!("  Products deleted: {}", summary.deleted);
    info!("  Products inserted: {}", summary.inserted);
    info!("  Products skipped (SKU exists): {}", summary.skipped);
    Ok(())
}

async fn import(
    database_url: &SecretString,
    products: &[CreateProductInput],
    replace: bool,
) -> Result<SeedSummary, SeedError> {
    let pool = db::create_pool(database_url).await?;
    let repo = ProductRepository::new(&pool);
    let mut summary = SeedSummary::default();

    if replace {
        summary.deleted = repo.delete_all().await?;
        info!(deleted = summary.deleted, "Existing products removed");
    }

    for product in products {
        match repo.create(product).await {
            Ok(created) => {
                info!(product_id = %created.id, sku = %created.sku, "Product inserted");
                summary.inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                warn!(sku = %product.sku, "SKU already exists, skipping");
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products_file() {
        let content = r#"[
            {
                "name": "Trail Runner",
                "description": "Lightweight trail running shoe",
                "price": "89.99",
                "sku": "SHOE-TR-01",
                "category": "Footwear",
                "brand": "Summit",
                "images": ["https://cdn.example.com/tr-01.jpg"],
                "attributes": {"color": "blue"},
                "isActive": true
            },
            {
                "name": "Camp Mug",
                "description": "Enamel mug",
                "price": "12.50",
                "sku": "MUG-01",
                "category": "Kitchen",
                "brand": "Summit"
            }
        ]"#;

        let products = parse_products(content).unwrap();
        assert_eq!(products.len(), 2);
        let mug = products.last().unwrap();
        assert_eq!(mug.sku, "MUG-01");
        assert!(mug.is_active);
        assert!(mug.images.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_entries() {
        let content = r#"[
            {"name": "", "description": "x", "price": "1", "sku": "A-1", "category": "c", "brand": "b"},
            {"name": "ok", "description": "x", "price": "-1", "sku": "lower", "category": "c", "brand": "b"}
        ]"#;

        let err = parse_products(content).unwrap_err();
        assert!(matches!(err, SeedError::Invalid(2)));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_products("{\"name\": 1}"),
            Err(SeedError::Parse(_))
        ));
    }
}

//! Business logic services.
//!
//! Route handlers stay thin: they extract input, call a service, and map
//! the result to JSON. Services validate input, apply the domain rules from
//! `websale-core`, run repository calls (inside a transaction where several
//! rows must change together), and publish events once the change commits.
//!
//! # Services
//!
//! - [`auth`] - Customer registration and password login
//! - [`catalog`] - Product CRUD with a read-through cache
//! - [`carts`] - Per-customer cart mutations
//! - [`customers`] - Customer listing, search and status
//! - [`inventory`] - Stock levels and reservations
//! - [`orders`] - Checkout and the order lifecycle
//! - [`events`] - In-process domain event bus

pub mod auth;
pub mod carts;
pub mod catalog;
pub mod customers;
pub mod events;
pub mod inventory;
pub mod orders;
pub mod validation;

use thiserror::Error;

use websale_core::StatusError;
use websale_core::cart::CartError;
use websale_core::inventory::InventoryError;

use crate::db::RepositoryError;

/// Errors returned by services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request conflicts with current state (duplicate key, etc.).
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Repository(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Extension for turning a missing row into [`ServiceError::NotFound`].
pub trait OrNotFound<T> {
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound(entity)` when the value is absent.
    fn or_not_found(self, entity: &'static str) -> Result<T, ServiceError>;
}

impl<T> OrNotFound<T> for Option<T> {
    fn or_not_found(self, entity: &'static str) -> Result<T, ServiceError> {
        self.ok_or(ServiceError::NotFound(entity))
    }
}

impl<T> OrNotFound<T> for Result<T, RepositoryError> {
    fn or_not_found(self, entity: &'static str) -> Result<T, ServiceError> {
        self.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::NotFound(entity),
            other => other.into(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_conflict_becomes_service_conflict() {
        let err: ServiceError = RepositoryError::Conflict("duplicate sku".to_string()).into();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "duplicate sku"));
    }

    #[test]
    fn test_or_not_found_names_entity() {
        let missing: Option<i32> = None;
        let err = missing.or_not_found("product").unwrap_err();
        assert_eq!(err.to_string(), "product not found");

        let gone: Result<i32, RepositoryError> = Err(RepositoryError::NotFound);
        assert!(matches!(gone.or_not_found("order"), Err(ServiceError::NotFound("order"))));
    }
}

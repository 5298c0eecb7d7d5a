//! Customer management commands.
//!
//! # Usage
//!
//! ```bash
//! ws-cli customer set-status -e jane@example.com -s blocked
//! ```
//!
//! Blocked and inactive customers can no longer log in; existing sessions
//! are not revoked.

use thiserror::Error;

use websale_api::db::{self, RepositoryError, customers::CustomerRepository};
use websale_core::{CustomerStatus, Email, EmailError, StatusError};

use crate::MissingDatabaseUrl;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error(transparent)]
    Config(#[from] MissingDatabaseUrl),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid status: {0}. Valid statuses: active, inactive, blocked")]
    InvalidStatus(#[from] StatusError),

    #[error("No customer with email: {0}")]
    NotFound(Email),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Change the status of the customer registered under `email`.
///
/// # Errors
///
/// Returns an error for a malformed email or status, an unknown customer,
/// or a database failure.
pub async fn set_status(email: &str, status: &str) -> Result<(), CustomerError> {
    let email = Email::parse(email)?;
    let status: CustomerStatus = status.parse()?;
    let database_url = crate::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let repo = CustomerRepository::new(&pool);

    let customer = repo
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CustomerError::NotFound(email.clone()))?;

    if customer.status == status {
        tracing::info!(customer_id = %customer.id, %status, "Status unchanged");
        return Ok(());
    }

    let updated = repo.update_status(customer.id, status).await?;
    tracing::info!(
        customer_id = %updated.id,
        email = %updated.email,
        from = %customer.status,
        to = %updated.status,
        "Customer status updated"
    );
    Ok(())
}

//! Customer administration service.

use websale_core::{CustomerId, CustomerStatus};

use super::{OrNotFound, ServiceError};
use crate::db::customers::CustomerRepository;
use crate::models::customer::{Customer, CustomerWithStats};
use crate::state::AppState;

/// Customer service.
pub struct CustomerService<'a> {
    customers: CustomerRepository<'a>,
}

impl<'a> CustomerService<'a> {
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self {
            customers: CustomerRepository::new(state.pool()),
        }
    }

    /// Every customer with order count and amount spent.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    pub async fn list(&self) -> Result<Vec<CustomerWithStats>, ServiceError> {
        Ok(self.customers.list_with_stats().await?)
    }

    /// Substring search over name, email and phone. A blank term matches
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the database fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Customer>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.customers.search(term).await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the customer does not exist.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, ServiceError> {
        self.customers.get_by_id(id).await?.or_not_found("customer")
    }

    /// Change a customer's account status.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Status` for an unknown status and
    /// `ServiceError::NotFound` if the customer does not exist.
    pub async fn update_status(&self, id: CustomerId, status: &str) -> Result<Customer, ServiceError> {
        let status: CustomerStatus = status.trim().parse()?;
        let customer = self
            .customers
            .update_status(id, status)
            .await
            .or_not_found("customer")?;

        tracing::info!(customer_id = %id, %status, "Customer status updated");
        Ok(customer)
    }
}

//! Customer repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use websale_core::{CustomerId, CustomerStatus, Email};

use super::{RepositoryError, conflict_on_unique, like_pattern};
use crate::models::customer::{Customer, CustomerWithStats};

const CUSTOMER_COLUMNS: &str =
    "id, email, first_name, last_name, phone, address, status, created_at, last_login_at";

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    email: String,
    first_name: String,
    last_name: String,
    phone: String,
    address: Option<String>,
    status: CustomerStatus,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            address: row.address,
            status: row.status,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerStatsRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    total_orders: i64,
    total_spent: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    password_hash: String,
}

/// Fields for a new customer row.
#[derive(Debug, Clone)]
pub struct NewCustomer<'a> {
    pub email: &'a Email,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub address: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(&self, new: &NewCustomer<'_>) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO websale.customer
                (email, first_name, last_name, phone, address, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(new.email)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.phone)
        .bind(new.address)
        .bind(new.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "an account with this email already exists"))?;

        row.try_into()
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM websale.customer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Customer::try_from)
        .transpose()
    }

    /// Get a customer by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM websale.customer WHERE LOWER(email) = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .map(Customer::try_from)
        .transpose()
    }

    /// Get a customer together with their password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(Customer, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS}, password_hash
             FROM websale.customer WHERE LOWER(email) = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.customer.try_into()?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Stamp a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record_login(&self, id: CustomerId) -> Result<DateTime<Utc>, RepositoryError> {
        let at = sqlx::query_scalar(
            "UPDATE websale.customer SET last_login_at = NOW() WHERE id = $1
             RETURNING last_login_at",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;
        Ok(at)
    }

    /// Change a customer's account status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    pub async fn update_status(
        &self,
        id: CustomerId,
        status: CustomerStatus,
    ) -> Result<Customer, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE websale.customer SET status = $2 WHERE id = $1
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?
        .try_into()
    }

    /// All customers with order count and amount spent, newest first.
    ///
    /// Cancelled orders count towards `total_orders` but not `total_spent`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_stats(&self) -> Result<Vec<CustomerWithStats>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerStatsRow>(
            "SELECT c.id, c.email, c.first_name, c.last_name, c.phone, c.address, c.status,
                    c.created_at, c.last_login_at,
                    COUNT(o.id) AS total_orders,
                    COALESCE(SUM(o.total_amount) FILTER (WHERE o.status <> 'cancelled'), 0)
                        AS total_spent
             FROM websale.customer c
             LEFT JOIN websale.customer_order o ON o.customer_id = c.id
             GROUP BY c.id
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(CustomerWithStats {
                    customer: r.customer.try_into()?,
                    total_orders: r.total_orders,
                    total_spent: r.total_spent,
                })
            })
            .collect()
    }

    /// Case-insensitive substring search over name, email and phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Customer>, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM websale.customer
             WHERE (first_name || ' ' || last_name) ILIKE $1
                OR email ILIKE $1
                OR phone ILIKE $1
             ORDER BY id
             LIMIT 100"
        ))
        .bind(like_pattern(term))
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(Customer::try_from)
        .collect()
    }
}

//! Customer account models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use websale_core::{CustomerId, CustomerStatus, Email};

/// A registered customer. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Customer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A customer with aggregate order statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerWithStats {
    #[serde(flatten)]
    pub customer: Customer,
    pub total_orders: i64,
    pub total_spent: Decimal,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(alias = "phoneNumber")]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Query for customer search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Listing wrapper, `{"customers": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerList<T> {
    pub customers: Vec<T>,
}

/// Single-customer envelope, `{"customer": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub customer: Customer,
}

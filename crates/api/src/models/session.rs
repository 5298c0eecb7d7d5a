//! Session-related types.

use serde::{Deserialize, Serialize};

use websale_core::{CustomerId, Email};

/// Session-stored customer identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    pub id: CustomerId,
    pub email: Email,
    pub name: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}

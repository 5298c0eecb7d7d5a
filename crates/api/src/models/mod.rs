//! Request, response and row-mapped domain models for the API.

pub mod cart;
pub mod customer;
pub mod dashboard;
pub mod inventory;
pub mod order;
pub mod product;
pub mod session;

pub use session::{CurrentCustomer, keys as session_keys};

use serde::{Deserialize, Serialize};

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A status change request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Response body for delete-style operations.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; the body is always `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use websale_core::StatusError;
use websale_core::cart::CartError;
use websale_core::inventory::InventoryError;

use crate::db::RepositoryError;
use crate::services::ServiceError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Business operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Customer is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Service(err) => service_status(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::AccountDisabled(_) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::CustomerAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Client-facing message. Internal details never leave the server.
    fn message(&self) -> String {
        match self {
            Self::Service(err) => match err {
                ServiceError::Repository(_) => "Internal server error".to_string(),
                ServiceError::NotFound(entity) => format!("{} not found", capitalize(entity)),
                other => other.to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::AccountDisabled(status) => format!("Account is {status}"),
                AuthError::CustomerAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) | AuthError::Validation(msg) => msg.clone(),
                AuthError::InvalidEmail(e) => format!("Invalid email address: {e}"),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::RateLimited => "Too many requests".to_string(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

const fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_)
        | ServiceError::Cart(
            CartError::InvalidQuantity | CartError::QuantityTooLarge | CartError::NegativePrice,
        )
        | ServiceError::Inventory(InventoryError::InvalidQuantity)
        | ServiceError::Status(StatusError::Unknown(_)) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_)
        | ServiceError::Cart(CartError::ItemNotFound(_))
        | ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_)
        | ServiceError::Repository(RepositoryError::Conflict(_))
        | ServiceError::Status(StatusError::IllegalTransition { .. })
        | ServiceError::Inventory(
            InventoryError::InsufficientStock { .. } | InventoryError::InsufficientReserved { .. },
        ) => StatusCode::CONFLICT,
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful authentication to associate errors with customers.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use websale_core::{OrderStatus, ProductId};

    use super::*;

    fn get_status(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::NotFound("test".to_string())), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::BadRequest("test".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(get_status(AppError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_status_codes() {
        assert_eq!(
            get_status(ServiceError::Validation("name is required".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(ServiceError::NotFound("product")), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(ServiceError::Conflict("duplicate sku".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ServiceError::from(CartError::ItemNotFound(ProductId::new(4)))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ServiceError::from(CartError::InvalidQuantity)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ServiceError::from(CartError::QuantityTooLarge)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ServiceError::from(InventoryError::InsufficientStock {
                requested: 5,
                available: 2,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ServiceError::from(StatusError::Unknown("refunded".to_string()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ServiceError::from(StatusError::IllegalTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Cancelled,
            })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(get_status(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AuthError::AccountDisabled(websale_core::CustomerStatus::Blocked)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AuthError::CustomerAlreadyExists), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AuthError::WeakPassword("too short".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AuthError::PasswordHash), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_body_is_json_error() {
        let response = AppError::from(ServiceError::NotFound("order")).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Order not found" }));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let err = AppError::from(ServiceError::Repository(RepositoryError::DataCorruption(
            "bad email in row 7".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), br#"{"error":"Internal server error"}"#);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("inventory item"), "Inventory item");
        assert_eq!(capitalize(""), "");
    }
}

//! Customer account route handlers.
//!
//! Login stores a [`CurrentCustomer`] in the server-side session; `me` and
//! `logout` read it back.

use axum::{extract::State, http::StatusCode};
use tower_sessions::Session;

use websale_core::CustomerId;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::extract::{Json, Path, Query};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_customer, set_current_customer};
use crate::models::customer::{
    Customer, CustomerList, CustomerResponse, CustomerWithStats, LoginInput, RegisterInput,
    SearchQuery,
};
use crate::models::order::OrderList;
use crate::models::{CurrentCustomer, MessageResponse, StatusUpdate};
use crate::services::auth::AuthService;
use crate::services::customers::CustomerService;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// `GET /api/customers`
pub async fn index(State(state): State<AppState>) -> Result<Json<CustomerList<CustomerWithStats>>> {
    let customers = CustomerService::new(&state).list().await?;
    Ok(Json(CustomerList { customers }))
}

/// `GET /api/customers/search?q=`
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<CustomerList<Customer>>> {
    let customers = CustomerService::new(&state).search(&query.q).await?;
    Ok(Json(CustomerList { customers }))
}

/// `POST /api/customers/register`
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    let customer = AuthService::new(&state).register(&input).await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse { customer })))
}

/// `POST /api/customers/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<LoginInput>,
) -> Result<Json<CustomerResponse>> {
    let customer = AuthService::new(&state).login(&input).await?;

    let current = CurrentCustomer {
        id: customer.id,
        email: customer.email.clone(),
        name: customer.full_name(),
    };
    set_current_customer(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store session: {e}")))?;
    set_sentry_user(&current.id, Some(current.email.as_str()));

    tracing::info!(customer_id = %customer.id, "customer logged in");
    Ok(Json(CustomerResponse { customer }))
}

/// `POST /api/customers/logout`
pub async fn logout(
    OptionalAuth(current): OptionalAuth,
    session: Session,
) -> Result<Json<MessageResponse>> {
    clear_current_customer(&session)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to clear session: {e}")))?;
    clear_sentry_user();

    if let Some(customer) = current {
        tracing::info!(customer_id = %customer.id, "customer logged out");
    }
    Ok(Json(MessageResponse::new("Logged out")))
}

/// `GET /api/customers/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(&state).get(current.id).await?;
    Ok(Json(CustomerResponse { customer }))
}

/// `GET /api/customers/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(&state).get(id).await?;
    Ok(Json(CustomerResponse { customer }))
}

/// `PUT /api/customers/{id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(&state)
        .update_status(id, &update.status)
        .await?;
    Ok(Json(CustomerResponse { customer }))
}

/// `GET /api/customers/{id}/orders`
pub async fn orders(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<OrderList>> {
    let orders = OrderService::new(&state).list_for_customer(id).await?;
    Ok(Json(orders.into()))
}

//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/products                       - List (category, searchTerm, isActive, page, pageSize)
//! POST   /api/products                       - Create
//! GET    /api/products/{id}                  - Get
//! PUT    /api/products/{id}                  - Partial update
//! DELETE /api/products/{id}                  - Delete
//!
//! # Cart (lazily created per customer)
//! GET    /api/cart/{customer_id}
//! DELETE /api/cart/{customer_id}
//! POST   /api/cart/{customer_id}/items
//! PUT    /api/cart/{customer_id}/items/{product_id}
//! DELETE /api/cart/{customer_id}/items/{product_id}
//!
//! # Orders
//! GET    /api/orders                         - List (status, customerId)
//! POST   /api/orders                         - Create
//! GET    /api/orders/{id}
//! PUT    /api/orders/{id}/status
//!
//! # Customers
//! GET    /api/customers                      - List with order stats
//! GET    /api/customers/search?q=
//! POST   /api/customers/register             - Rate limited
//! POST   /api/customers/login                - Rate limited, sets session
//! POST   /api/customers/logout
//! GET    /api/customers/me                   - Requires session
//! GET    /api/customers/{id}
//! PUT    /api/customers/{id}/status
//! GET    /api/customers/{id}/orders
//!
//! # Inventory (keyed by product id)
//! POST   /api/inventory
//! GET    /api/inventory/low-stock
//! GET    /api/inventory/{product_id}
//! POST   /api/inventory/{product_id}/adjust|reserve|release|commit
//!
//! # Payments and shipping (stubs)
//! POST   /api/payments/process
//! GET    /api/payments/{id}
//! POST   /api/shipping/create
//! GET    /api/shipping/{id}/track
//!
//! # Dashboard
//! GET    /api/dashboard/stats
//! ```

pub mod cart;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shipping;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/{customer_id}", get(cart::show).delete(cart::clear))
        .route("/{customer_id}/items", post(cart::add_item))
        .route(
            "/{customer_id}/items/{product_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the customer routes router.
///
/// Registration and login sit behind the per-IP rate limiter.
pub fn customer_routes() -> Router<AppState> {
    let credentials = Router::new()
        .route("/register", post(customers::register))
        .route("/login", post(customers::login))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/", get(customers::index))
        .route("/search", get(customers::search))
        .route("/logout", post(customers::logout))
        .route("/me", get(customers::me))
        .route("/{id}", get(customers::show))
        .route("/{id}/status", put(customers::update_status))
        .route("/{id}/orders", get(customers::orders))
        .merge(credentials)
}

/// Create the inventory routes router.
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(inventory::create))
        .route("/low-stock", get(inventory::low_stock))
        .route("/{product_id}", get(inventory::show))
        .route("/{product_id}/adjust", post(inventory::adjust))
        .route("/{product_id}/reserve", post(inventory::reserve))
        .route("/{product_id}/release", post(inventory::release))
        .route("/{product_id}/commit", post(inventory::commit))
}

/// Create the payment and shipping stub routers.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/process", post(payments::process))
        .route("/{id}", get(payments::show))
}

pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(shipping::create))
        .route("/{id}/track", get(shipping::track))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/customers", customer_routes())
        .nest("/inventory", inventory_routes())
        .nest("/payments", payment_routes())
        .nest("/shipping", shipping_routes())
        .route("/dashboard/stats", get(dashboard::stats));

    Router::new().nest("/api", api)
}

//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (pings the database)
//!
//! # Users & auth
//! POST   /api/users/signup           - Register an account
//! POST   /api/users/login            - Login, returns a bearer token
//! GET    /api/users                  - List accounts (bearer)
//! GET    /api/users/{id}             - Fetch an account (bearer)
//! DELETE /api/users/{id}             - Delete own account (bearer, owner)
//!
//! # Products
//! GET    /api/products               - List the catalog
//! GET    /api/products/{id}          - Product detail
//! POST   /api/products               - Add a product (bearer)
//! PATCH  /api/products/{id}          - Update a product (bearer)
//! DELETE /api/products/{id}          - Remove a product (bearer)
//!
//! # Orders
//! GET    /api/orders                 - List all orders (bearer)
//! PATCH  /api/orders/{id}            - Update an order (bearer)
//! DELETE /api/orders/{id}            - Delete an order (bearer)
//! GET    /api/users/{id}/orders      - One user's orders (bearer, owner)
//! POST   /api/users/{id}/orders      - Create an order (bearer, owner)
//!
//! # Cart (bearer, owner)
//! GET    /api/users/{id}/cart          - Resolved (priced) cart view
//! POST   /api/users/{id}/cart          - Add a product / accumulate quantity
//! PATCH  /api/users/{id}/cart          - Overwrite a line's quantity
//! DELETE /api/users/{id}/cart          - Remove a line (idempotent)
//! POST   /api/users/{id}/cart/checkout - Create a hosted payment session
//! ```

pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use pomelo_core::UserId;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Reject requests whose bearer token does not belong to the path owner.
fn ensure_owner(current_user: &CurrentUser, user_id: UserId) -> Result<(), ApiError> {
    if current_user.0.user_id() == user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "token does not match the requested user".to_owned(),
        ))
    }
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route("/{id}", get(users::show).delete(users::destroy))
        .route(
            "/{id}/orders",
            get(orders::index_for_user).post(orders::create),
        )
        .route(
            "/{id}/cart",
            get(cart::show)
                .post(cart::add)
                .patch(cart::set_quantity)
                .delete(cart::remove),
        )
        .route("/{id}/cart/checkout", post(cart::checkout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route(
            "/{id}",
            delete(orders::destroy).patch(orders::update),
        )
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes())
}

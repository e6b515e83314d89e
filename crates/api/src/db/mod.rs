//! Database access for the Pomelo API.
//!
//! # Tables
//!
//! - `users` - Accounts with argon2 password hashes
//! - `products` - The catalog
//! - `carts` / `cart_items` - One cart per user; one row per (cart, product)
//! - `orders` - Order records with a JSONB item snapshot
//!
//! Queries use the sqlx runtime API (`query` / `query_as`) so the workspace
//! builds without a live database. Migrations live in
//! `crates/api/migrations/` and run via `pomelo-cli migrate`.

pub mod carts;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data failed validation on the way out.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

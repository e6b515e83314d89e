//! Order repository for database operations.
//!
//! Order items are stored as a JSONB snapshot; they are historical records,
//! not live references into the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use pomelo_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

/// Database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<OrderItem>>,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            items: self.items.0,
            total: self.total,
            status,
            created_at: self.created_at,
        })
    }
}

/// Partial update for an order; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub items: Option<Vec<OrderItem>>,
    pub total: Option<Decimal>,
    pub status: Option<OrderStatus>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, items, total, status, created_at
            FROM orders
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// List one user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, items, total, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Create a new pending order for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Decimal,
    ) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, items, total)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, items, total, status, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(Json(items))
        .bind(total)
        .fetch_one(self.pool)
        .await?;

        row.into_order()
    }

    /// Apply a partial update to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: OrderId,
        patch: &OrderPatch,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            UPDATE orders
            SET items = COALESCE($2, items),
                total = COALESCE($3, total),
                status = COALESCE($4, status)
            WHERE id = $1
            RETURNING id, user_id, items, total, status, created_at
            ",
        )
        .bind(id.as_i32())
        .bind(patch.items.as_ref().map(Json))
        .bind(patch.total)
        .bind(patch.status.map(|s| s.to_string()))
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an order by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

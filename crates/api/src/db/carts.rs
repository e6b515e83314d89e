//! Cart repository for database operations.
//!
//! One cart per user, created lazily on the first add. Lines are unique per
//! `(cart, product)`; the `BIGSERIAL` row id preserves insertion order for
//! display. Mutations are single atomic statements, so concurrent updates
//! to the same cart serialize at the row level with no application locking.

use sqlx::PgPool;

use pomelo_core::cart::{CartLine, MAX_LINE_QUANTITY};
use pomelo_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::Cart;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a user's cart lines in insertion order.
    ///
    /// A user with no cart yields an empty list; "no cart" and "empty cart"
    /// are the same observable state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored quantity is invalid.
    pub async fn lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<(i32, i32)> = sqlx::query_as(
            r"
            SELECT ci.product_id, ci.quantity
            FROM cart_items ci
            JOIN carts c ON ci.cart_id = c.id
            WHERE c.user_id = $1
            ORDER BY ci.id ASC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(product_id, quantity)| {
                let quantity = u32::try_from(quantity).map_err(|_| {
                    RepositoryError::DataCorruption(format!(
                        "negative quantity for product {product_id}"
                    ))
                })?;
                Ok(CartLine {
                    product_id: ProductId::new(product_id),
                    quantity,
                })
            })
            .collect()
    }

    /// Add a product to the cart, accumulating quantity on an existing line.
    ///
    /// Creates the cart if the user doesn't have one yet. A new line is
    /// appended after existing lines; an existing line for the same product
    /// has its quantity increased by `quantity` instead, saturating at
    /// `MAX_LINE_QUANTITY` (the sum is computed in 64-bit, so it never
    /// overflows the `INTEGER` column). The whole upsert is one statement,
    /// so concurrent adds never lose increments.
    ///
    /// Callers validate `quantity <= MAX_LINE_QUANTITY` at the boundary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_or_increment(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, RepositoryError> {
        sqlx::query(
            r"
            WITH cart AS (
                INSERT INTO carts (user_id)
                VALUES ($1)
                ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
                RETURNING id
            )
            INSERT INTO cart_items (cart_id, product_id, quantity)
            SELECT id, $2, LEAST($3, $4)::integer FROM cart
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity =
                LEAST(cart_items.quantity::bigint + EXCLUDED.quantity, $4)::integer
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(i64::from(quantity))
        .bind(i64::from(MAX_LINE_QUANTITY))
        .execute(self.pool)
        .await?;

        let items = self.lines(user_id).await?;
        Ok(Cart { user_id, items })
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// Unlike [`Self::add_or_increment`] this never creates a line: when no
    /// line matches, zero rows are modified and the caller sees that in the
    /// returned count.
    ///
    /// Callers validate `quantity <= MAX_LINE_QUANTITY` at the boundary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = LEAST($3, $4)::integer
            FROM carts
            WHERE cart_items.cart_id = carts.id
              AND carts.user_id = $1
              AND cart_items.product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(i64::from(quantity))
        .bind(i64::from(MAX_LINE_QUANTITY))
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Remove the line for a product, if present.
    ///
    /// Idempotent: removing an absent line (or from an absent cart) is not
    /// an error. Remaining lines keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Cart, RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM cart_items
            USING carts
            WHERE cart_items.cart_id = carts.id
              AND carts.user_id = $1
              AND cart_items.product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .execute(self.pool)
        .await?;

        let items = self.lines(user_id).await?;
        Ok(Cart { user_id, items })
    }
}

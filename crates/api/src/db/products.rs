//! Product repository for database operations.
//!
//! Products are read-only from the cart's perspective; the mutation methods
//! here back the catalog administration endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pomelo_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Database row for a product.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    quantity: i32,
    category: Vec<String>,
    price: Decimal,
    description: Option<String>,
    image: String,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            quantity: row.quantity,
            category: row.category,
            price: row.price,
            description: row.description,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

/// Fields for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i32,
    pub category: Vec<String>,
    pub price: Decimal,
    pub description: Option<String>,
    pub image: String,
}

/// Partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub category: Option<Vec<String>>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole catalog, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, quantity, category, price, description, image, created_at
            FROM products
            ORDER BY created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, quantity, category, price, description, image, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Batch-fetch products by ID for the cart resolution join.
    ///
    /// Missing IDs are simply absent from the result; the caller's join
    /// decides what to do about them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, quantity, category, price, description, image, created_at
            FROM products
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO products (name, quantity, category, price, description, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, quantity, category, price, description, image, created_at
            ",
        )
        .bind(&product.name)
        .bind(product.quantity)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            UPDATE products
            SET name = COALESCE($2, name),
                quantity = COALESCE($3, quantity),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                description = COALESCE($6, description),
                image = COALESCE($7, image)
            WHERE id = $1
            RETURNING id, name, quantity, category, price, description, image, created_at
            ",
        )
        .bind(id.as_i32())
        .bind(&patch.name)
        .bind(patch.quantity)
        .bind(&patch.category)
        .bind(patch.price)
        .bind(&patch.description)
        .bind(&patch.image)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product by ID.
    ///
    /// Cart lines referencing the product are left in place; the cart
    /// resolution join drops them from the client view.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Cart resolution service.
//!
//! Resolution is deliberately a two-step operation instead of a database
//! join: fetch the cart lines, batch-fetch the referenced products, then
//! hand both to the pure join in `pomelo_core::cart`. That keeps the
//! pricing logic testable without a storage engine.

use sqlx::PgPool;

use pomelo_core::UserId;
use pomelo_core::cart::{ProductSnapshot, ResolvedCart, resolve_cart};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;

/// Service producing the denormalized cart view.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Resolve a user's cart against the current catalog.
    ///
    /// Lines whose product has been deleted from the catalog are dropped
    /// from the view (inner-join semantics). A user with no cart gets an
    /// empty view, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either fetch fails.
    pub async fn resolved_cart(&self, user_id: UserId) -> Result<ResolvedCart, RepositoryError> {
        let lines = self.carts.lines(user_id).await?;
        if lines.is_empty() {
            return Ok(ResolvedCart::empty(user_id));
        }

        let ids: Vec<_> = lines.iter().map(|l| l.product_id).collect();
        let snapshots: Vec<ProductSnapshot> = self
            .products
            .get_many(&ids)
            .await?
            .iter()
            .map(crate::models::Product::snapshot)
            .collect();

        Ok(resolve_cart(user_id, &lines, &snapshots))
    }
}

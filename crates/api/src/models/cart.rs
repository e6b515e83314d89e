//! Cart domain types.
//!
//! The resolved (priced) view of a cart lives in `pomelo_core::cart`; this
//! type is the stored shape returned by mutation endpoints.

use serde::Serialize;

use pomelo_core::UserId;
use pomelo_core::cart::CartLine;

/// A stored cart: the owner plus its lines in insertion order.
///
/// The surrogate cart row id is an implementation detail of the storage
/// layer and never leaves it.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Owning user. One cart per user.
    pub user_id: UserId,
    /// Lines in insertion order. At most one line per product.
    pub items: Vec<CartLine>,
}

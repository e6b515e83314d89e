//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use pomelo_core::ProductId;
use pomelo_core::cart::ProductSnapshot;

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Units in stock.
    pub quantity: i32,
    /// Category labels for browsing.
    pub category: Vec<String>,
    /// Unit price in major currency units.
    pub price: Decimal,
    /// Longer marketing copy.
    pub description: Option<String>,
    /// Image path served under `/images`.
    pub image: String,
    /// When the product was added to the catalog.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The product fields the cart resolution join needs.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            unit_price: self.price,
            image: self.image.clone(),
        }
    }
}

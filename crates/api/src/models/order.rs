//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pomelo_core::{OrderId, OrderStatus, ProductId, UserId};

/// One purchased line within an order, snapshotted at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product that was purchased.
    pub product_id: ProductId,
    /// Units purchased.
    pub quantity: u32,
}

/// An order record.
///
/// Orders are created by an explicit client call, never by the checkout
/// path itself; see DESIGN.md for the open question on reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User the order belongs to.
    pub user_id: UserId,
    /// Item snapshot taken when the order was placed.
    pub items: Vec<OrderItem>,
    /// Order total in major currency units.
    pub total: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

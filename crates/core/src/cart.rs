//! Cart resolution, pricing, and checkout line-item assembly.
//!
//! The storage layer holds carts as plain `(product, quantity)` lines.
//! Clients want a denormalized view with live product names, images, and
//! prices, so resolution is a two-step operation: the API layer fetches the
//! cart lines plus the referenced products, and [`resolve_cart`] joins and
//! prices them in memory. Keeping the join here, on plain data, means the
//! pricing logic is testable without a storage engine.
//!
//! Join semantics are an inner join: a line whose product has vanished from
//! the catalog is dropped from the view rather than surfaced with a
//! placeholder. Totals are computed at resolution time, so price changes
//! are reflected live.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{CurrencyCode, ProductId, UserId, to_minor_units};

/// Upper bound on a single line's quantity.
///
/// Requests beyond it are rejected at the boundary; accumulation in the
/// store saturates here, so a stored quantity always fits a 32-bit
/// integer column.
pub const MAX_LINE_QUANTITY: u32 = 1_000_000;

/// One stored cart line: a product reference and a quantity.
///
/// Invariant: `1 <= quantity <= MAX_LINE_QUANTITY`. The store never holds
/// zero-quantity lines; removal is always an explicit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Referenced product.
    pub product_id: ProductId,
    /// Units of the product in the cart.
    pub quantity: u32,
}

/// The product fields the cart view needs, captured at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    /// Unit price in major currency units (e.g. 49.99).
    pub unit_price: Decimal,
    /// Image path or URL for display.
    pub image: String,
}

/// A cart line joined with its product snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub name: String,
    pub image: String,
    pub unit_price: Decimal,
    /// `quantity * unit_price`, computed at resolution time.
    pub line_total: Decimal,
}

/// The denormalized cart view returned to clients.
///
/// An owner with no cart and an owner with an empty cart are the same
/// observable state: both produce an empty `lines` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCart {
    pub user_id: UserId,
    pub lines: Vec<ResolvedLine>,
}

impl ResolvedCart {
    /// Create an empty cart view for an owner.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            lines: Vec::new(),
        }
    }

    /// Whether the resolved cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|l| l.line_total).sum()
    }
}

/// One line item in the shape the payment-session provider expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLineItem {
    /// Display name shown on the hosted payment page.
    pub name: String,
    /// Absolute image URL for the hosted payment page.
    pub image_url: String,
    /// Unit amount in minor currency units (`round(unit_price * 100)`).
    pub unit_amount: i64,
    /// ISO currency code.
    pub currency: CurrencyCode,
    /// Units purchased.
    pub quantity: u32,
}

/// Errors from checkout assembly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// The resolved cart has no lines; checkout must not proceed.
    #[error("cart is empty")]
    EmptyCart,
    /// A unit price does not fit in minor units (corrupt catalog data).
    #[error("unit price for product {0} is out of range")]
    AmountOutOfRange(ProductId),
}

/// Join cart lines with their product snapshots and compute line totals.
///
/// Lines keep their input order. Lines referencing a product absent from
/// `products` are dropped (inner join). Duplicate snapshots for the same
/// product are allowed; the last one wins.
#[must_use]
pub fn resolve_cart(
    user_id: UserId,
    lines: &[CartLine],
    products: &[ProductSnapshot],
) -> ResolvedCart {
    let by_id: HashMap<ProductId, &ProductSnapshot> =
        products.iter().map(|p| (p.id, p)).collect();

    let lines = lines
        .iter()
        .filter_map(|line| {
            let product = by_id.get(&line.product_id)?;
            Some(ResolvedLine {
                product_id: line.product_id,
                quantity: line.quantity,
                name: product.name.clone(),
                image: product.image.clone(),
                unit_price: product.unit_price,
                line_total: Decimal::from(line.quantity) * product.unit_price,
            })
        })
        .collect();

    ResolvedCart { user_id, lines }
}

/// Map a resolved cart into payment-provider line items.
///
/// `image_base_url` is prepended to relative image paths so the hosted
/// payment page can fetch them. Fails before any external call when the
/// cart is empty.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no lines, and
/// [`CheckoutError::AmountOutOfRange`] if a unit price cannot be expressed
/// in minor units.
pub fn checkout_line_items(
    cart: &ResolvedCart,
    currency: CurrencyCode,
    image_base_url: &str,
) -> Result<Vec<CheckoutLineItem>, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    cart.lines
        .iter()
        .map(|line| {
            let unit_amount = to_minor_units(line.unit_price)
                .ok_or(CheckoutError::AmountOutOfRange(line.product_id))?;
            Ok(CheckoutLineItem {
                name: line.name.clone(),
                image_url: absolute_image_url(image_base_url, &line.image),
                unit_amount,
                currency,
                quantity: line.quantity,
            })
        })
        .collect()
}

/// Prepend the base URL to relative image paths; pass absolute URLs through.
fn absolute_image_url(base_url: &str, image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_owned()
    } else {
        let base = base_url.trim_end_matches('/');
        let path = image.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i32, name: &str, price: Decimal) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: name.to_owned(),
            unit_price: price,
            image: format!("/images/{name}.jpg"),
        }
    }

    fn line(product_id: i32, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(product_id),
            quantity,
        }
    }

    #[test]
    fn single_line_total_is_quantity_times_unit_price() {
        let products = [snapshot(1, "kettle", Decimal::new(5000, 2))];
        let cart = resolve_cart(UserId::new(9), &[line(1, 2)], &products);

        assert_eq!(cart.lines.len(), 1);
        let resolved = &cart.lines[0];
        assert_eq!(resolved.quantity, 2);
        assert_eq!(resolved.line_total, Decimal::new(10000, 2));
        assert_eq!(cart.subtotal(), Decimal::new(10000, 2));
    }

    #[test]
    fn totals_use_price_at_resolution_time() {
        let lines = [line(1, 3)];
        let before = [snapshot(1, "kettle", Decimal::new(1000, 2))];
        let after = [snapshot(1, "kettle", Decimal::new(1250, 2))];

        let cart = resolve_cart(UserId::new(1), &lines, &before);
        assert_eq!(cart.lines[0].line_total, Decimal::new(3000, 2));

        // Same stored lines, new catalog price: the view reflects it live.
        let cart = resolve_cart(UserId::new(1), &lines, &after);
        assert_eq!(cart.lines[0].line_total, Decimal::new(3750, 2));
    }

    #[test]
    fn vanished_product_drops_its_line() {
        // Product 2 was deleted from the catalog after being added to the
        // cart. The inner join drops its line silently.
        let products = [
            snapshot(1, "kettle", Decimal::new(5000, 2)),
            snapshot(3, "teapot", Decimal::new(2000, 2)),
        ];
        let lines = [line(1, 1), line(2, 4), line(3, 1)];

        let cart = resolve_cart(UserId::new(5), &lines, &products);

        let ids: Vec<i32> = cart.lines.iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn all_products_vanished_yields_empty_view() {
        let cart = resolve_cart(UserId::new(5), &[line(7, 2)], &[]);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn line_order_is_preserved() {
        let products = [
            snapshot(3, "teapot", Decimal::ONE),
            snapshot(1, "kettle", Decimal::ONE),
            snapshot(2, "mug", Decimal::ONE),
        ];
        let lines = [line(2, 1), line(3, 1), line(1, 1)];

        let cart = resolve_cart(UserId::new(1), &lines, &products);

        let ids: Vec<i32> = cart.lines.iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn empty_cart_fails_checkout_assembly() {
        let cart = ResolvedCart::empty(UserId::new(1));
        assert_eq!(
            checkout_line_items(&cart, CurrencyCode::Usd, "http://localhost:8000"),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn checkout_items_carry_minor_units_and_absolute_urls() {
        let products = [snapshot(1, "kettle", Decimal::new(4999, 2))];
        let cart = resolve_cart(UserId::new(2), &[line(1, 3)], &products);

        let items = checkout_line_items(&cart, CurrencyCode::Zar, "http://localhost:8000/")
            .expect("non-empty cart");

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.name, "kettle");
        assert_eq!(item.unit_amount, 4999);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.currency, CurrencyCode::Zar);
        assert_eq!(item.image_url, "http://localhost:8000/images/kettle.jpg");
    }

    #[test]
    fn checkout_passes_absolute_image_urls_through() {
        let products = [ProductSnapshot {
            id: ProductId::new(1),
            name: "kettle".to_owned(),
            unit_price: Decimal::ONE,
            image: "https://cdn.example.com/kettle.jpg".to_owned(),
        }];
        let cart = resolve_cart(UserId::new(2), &[line(1, 1)], &products);

        let items = checkout_line_items(&cart, CurrencyCode::Usd, "http://localhost:8000")
            .expect("non-empty cart");
        assert_eq!(items[0].image_url, "https://cdn.example.com/kettle.jpg");
    }
}

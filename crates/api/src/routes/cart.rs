//! Cart route handlers.
//!
//! All cart routes are scoped under `/api/users/{id}/cart` and require a
//! bearer token whose subject matches the path owner. Reads return the
//! resolved (priced) view; mutations return the stored lines.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pomelo_core::cart::{CartLine, MAX_LINE_QUANTITY, ResolvedCart, checkout_line_items};
use pomelo_core::{ProductId, UserId};

use crate::db::carts::CartRepository;
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::models::Cart;
use crate::services::carts::CartService;
use crate::state::AppState;

use super::ensure_owner;

/// The priced cart view returned by `GET`.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub user_id: UserId,
    pub items: Vec<CartLineView>,
    pub subtotal: Decimal,
}

/// One priced line in the cart view.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
}

impl From<ResolvedCart> for CartView {
    fn from(cart: ResolvedCart) -> Self {
        let subtotal = cart.subtotal();
        Self {
            user_id: cart.user_id,
            items: cart
                .lines
                .into_iter()
                .map(|line| CartLineView {
                    product_id: line.product_id,
                    name: line.name,
                    image: line.image,
                    price: line.unit_price,
                    quantity: line.quantity,
                    total_price: line.line_total,
                })
                .collect(),
            subtotal,
        }
    }
}

/// The stored cart returned by mutations.
#[derive(Debug, Serialize)]
pub struct StoredCartResponse {
    pub user_id: UserId,
    pub items: Vec<CartLine>,
}

impl From<Cart> for StoredCartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            user_id: cart.user_id,
            items: cart.items,
        }
    }
}

/// Body for `POST /api/users/{id}/cart`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    /// Defaults to 1 when omitted.
    pub quantity: Option<u32>,
}

/// Body for `PATCH /api/users/{id}/cart`.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Response for `PATCH /api/users/{id}/cart`.
///
/// `modified` is 0 when no line matched the product; setting a quantity
/// never creates a line.
#[derive(Debug, Serialize)]
pub struct SetQuantityResponse {
    pub modified: u64,
}

/// Body for `DELETE /api/users/{id}/cart`.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product_id: ProductId,
}

/// Response for `POST /api/users/{id}/cart/checkout`.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Opaque payment session id for the client-side redirect.
    pub session_id: String,
}

/// Reject quantities outside `1..=MAX_LINE_QUANTITY` with a 400.
fn ensure_quantity_in_range(quantity: u32) -> Result<()> {
    if quantity < 1 {
        return Err(ApiError::BadRequest(
            "quantity must be at least 1".to_owned(),
        ));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(ApiError::BadRequest(format!(
            "quantity must not exceed {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

/// `GET /api/users/{id}/cart` - the resolved cart view.
///
/// Lines referencing deleted products are dropped; prices and totals
/// reflect the catalog at request time.
#[instrument(skip(state, current_user))]
pub async fn show(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartView>> {
    ensure_owner(&current_user, user_id)?;

    let cart = CartService::new(state.pool())
        .resolved_cart(user_id)
        .await?;

    Ok(Json(cart.into()))
}

/// `POST /api/users/{id}/cart` - add a product or accumulate quantity.
#[instrument(skip(state, current_user))]
pub async fn add(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<StoredCartResponse>> {
    ensure_owner(&current_user, user_id)?;

    let quantity = body.quantity.unwrap_or(1);
    ensure_quantity_in_range(quantity)?;

    let cart = CartRepository::new(state.pool())
        .add_or_increment(user_id, body.product_id, quantity)
        .await?;

    Ok(Json(cart.into()))
}

/// `PATCH /api/users/{id}/cart` - overwrite a line's quantity.
///
/// Never creates a line: targeting an absent product reports
/// `modified: 0`. Quantities below 1 are rejected; removal is an
/// explicit `DELETE`.
#[instrument(skip(state, current_user))]
pub async fn set_quantity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<SetQuantityResponse>> {
    ensure_owner(&current_user, user_id)?;

    ensure_quantity_in_range(body.quantity)?;

    let modified = CartRepository::new(state.pool())
        .set_quantity(user_id, body.product_id, body.quantity)
        .await?;

    Ok(Json(SetQuantityResponse { modified }))
}

/// `DELETE /api/users/{id}/cart` - remove a product's line.
///
/// Idempotent; removing an absent line returns the cart unchanged.
#[instrument(skip(state, current_user))]
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
    Json(body): Json<RemoveItemRequest>,
) -> Result<Json<StoredCartResponse>> {
    ensure_owner(&current_user, user_id)?;

    let cart = CartRepository::new(state.pool())
        .remove_line(user_id, body.product_id)
        .await?;

    Ok(Json(cart.into()))
}

/// `POST /api/users/{id}/cart/checkout` - create a hosted payment session.
///
/// Resolves the cart, prices it in minor units, and creates a Stripe
/// Checkout session. An empty cart fails with 400 before any external
/// call is made.
#[instrument(skip(state, current_user))]
pub async fn checkout(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<CheckoutResponse>> {
    ensure_owner(&current_user, user_id)?;

    let cart = CartService::new(state.pool())
        .resolved_cart(user_id)
        .await?;

    let config = state.config();
    let items = checkout_line_items(&cart, config.currency, &config.base_url)?;

    let session = state.stripe().create_session(&items).await?;

    Ok(Json(CheckoutResponse {
        session_id: session.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_within_range_are_accepted() {
        assert!(ensure_quantity_in_range(1).is_ok());
        assert!(ensure_quantity_in_range(5).is_ok());
        assert!(ensure_quantity_in_range(MAX_LINE_QUANTITY).is_ok());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(matches!(
            ensure_quantity_in_range(0),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn quantity_above_the_cap_is_rejected() {
        // Anything past the cap would otherwise clamp silently or overflow
        // the 32-bit quantity column on accumulation.
        assert!(matches!(
            ensure_quantity_in_range(MAX_LINE_QUANTITY + 1),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            ensure_quantity_in_range(u32::MAX),
            Err(ApiError::BadRequest(_))
        ));
    }
}

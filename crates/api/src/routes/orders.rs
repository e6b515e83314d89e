//! Order route handlers.
//!
//! Orders are explicit records created by clients; the checkout flow does
//! not create them itself.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use pomelo_core::{OrderId, OrderStatus, UserId};

use crate::db::orders::{OrderPatch, OrderRepository};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Order, OrderItem};
use crate::state::AppState;

use super::ensure_owner;

/// Body for `POST /api/orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

/// Body for `PATCH /api/orders/{id}`; omitted fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub items: Option<Vec<OrderItem>>,
    pub total: Option<Decimal>,
    pub status: Option<OrderStatus>,
}

/// `GET /api/orders` - list all orders, newest first.
#[instrument(skip(state, _current_user))]
pub async fn index(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(orders))
}

/// `GET /api/users/{id}/orders` - one user's order history.
#[instrument(skip(state, current_user))]
pub async fn index_for_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    ensure_owner(&current_user, user_id)?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;
    Ok(Json(orders))
}

/// `POST /api/users/{id}/orders` - create a pending order for a user.
#[instrument(skip(state, current_user, body))]
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    ensure_owner(&current_user, user_id)?;

    if body.items.is_empty() {
        return Err(ApiError::BadRequest(
            "an order needs at least one item".to_owned(),
        ));
    }
    if body.total < Decimal::ZERO {
        return Err(ApiError::BadRequest("total must not be negative".to_owned()));
    }

    let order = OrderRepository::new(state.pool())
        .create(user_id, &body.items, body.total)
        .await?;

    tracing::info!(order_id = %order.id, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// `PATCH /api/orders/{id}` - partially update an order.
#[instrument(skip(state, _current_user, body))]
pub async fn update(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<OrderId>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update(
            order_id,
            &OrderPatch {
                items: body.items,
                total: body.total,
                status: body.status,
            },
        )
        .await?;

    Ok(Json(order))
}

/// `DELETE /api/orders/{id}` - delete an order record.
#[instrument(skip(state, _current_user))]
pub async fn destroy(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<OrderId>,
) -> Result<StatusCode> {
    let deleted = OrderRepository::new(state.pool()).delete(order_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("order {order_id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

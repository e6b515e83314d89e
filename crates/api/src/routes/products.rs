//! Product catalog route handlers.
//!
//! Reads are public; catalog mutations require a bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use pomelo_core::ProductId;

use crate::db::products::{NewProduct, ProductPatch, ProductRepository};
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::models::Product;
use crate::state::AppState;

/// Body for `POST /api/products`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub category: Vec<String>,
    pub price: Decimal,
    pub description: Option<String>,
    pub image: String,
}

/// Body for `PATCH /api/products/{id}`; omitted fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub category: Option<Vec<String>>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// `GET /api/products` - list the catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}` - fetch one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))?;

    Ok(Json(product))
}

/// `POST /api/products` - add a product to the catalog.
#[instrument(skip(state, _current_user, body))]
pub async fn create(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_owned()));
    }
    if body.price < Decimal::ZERO {
        return Err(ApiError::BadRequest("price must not be negative".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: body.name,
            quantity: body.quantity,
            category: body.category,
            price: body.price,
            description: body.description,
            image: body.image,
        })
        .await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PATCH /api/products/{id}` - partially update a product.
#[instrument(skip(state, _current_user, body))]
pub async fn update(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if let Some(price) = body.price
        && price < Decimal::ZERO
    {
        return Err(ApiError::BadRequest("price must not be negative".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .update(
            product_id,
            &ProductPatch {
                name: body.name,
                quantity: body.quantity,
                category: body.category,
                price: body.price,
                description: body.description,
                image: body.image,
            },
        )
        .await?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}` - remove a product from the catalog.
///
/// Cart lines referencing the product survive in storage; the cart view
/// drops them at resolution time.
#[instrument(skip(state, _current_user))]
pub async fn destroy(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool())
        .delete(product_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("product {product_id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

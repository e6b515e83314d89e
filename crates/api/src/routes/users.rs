//! User and authentication route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pomelo_core::UserId;

use crate::db::users::UserRepository;
use crate::error::{ApiError, Result};
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

use super::ensure_owner;

/// Body for `POST /api/users/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for `POST /api/users/login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// `POST /api/users/signup` - register a new account.
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let user = auth.register(&body.name, &body.email, &body.password).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/users/login` - authenticate and issue a bearer token.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let (user, token) = auth.login(&body.email, &body.password).await?;

    crate::error::set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Json(LoginResponse { user, token }))
}

/// `GET /api/users` - list all accounts.
#[instrument(skip(state, _current_user))]
pub async fn index(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// `GET /api/users/{id}` - fetch one account.
#[instrument(skip(state, _current_user))]
pub async fn show(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))?;

    Ok(Json(user))
}

/// `DELETE /api/users/{id}` - delete the authenticated user's own account.
#[instrument(skip(state, current_user))]
pub async fn destroy(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode> {
    ensure_owner(&current_user, user_id)?;

    let deleted = UserRepository::new(state.pool()).delete(user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("user {user_id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

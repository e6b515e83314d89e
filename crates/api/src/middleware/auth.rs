//! Bearer token authentication extractor.
//!
//! Token verification happens exactly once, at request entry, by extracting
//! [`CurrentUser`] in the handler signature. Handlers never see the raw
//! `Authorization` header.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::services::auth::{self, Claims};
use crate::state::AppState;

/// The authenticated user for the current request.
///
/// Extracting this from a request verifies the `Authorization: Bearer`
/// token against the configured signing secret; requests without a valid
/// token are rejected with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_owned()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".to_owned()))?;

        let claims = auth::verify_token(token, &state.config().jwt_secret)?;

        crate::error::set_sentry_user(&claims.sub, Some(&claims.email));

        Ok(Self(claims))
    }
}

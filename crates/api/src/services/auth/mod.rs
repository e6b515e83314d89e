//! Authentication service.
//!
//! Passwords are hashed with Argon2id. Successful logins are issued a
//! short-lived HS256 bearer token; every protected request verifies the
//! token once at request entry (see `crate::middleware::auth`) instead of
//! handlers decoding credentials ad hoc.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use pomelo_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// How long issued bearer tokens stay valid.
const TOKEN_TTL_HOURS: i64 = 24;

/// Bearer token claims.
///
/// This is the session context established at request entry; handlers
/// receive it through the `CurrentUser` extractor and never touch the raw
/// token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user's ID.
    pub sub: i32,
    /// Email at issuance time.
    pub email: String,
    /// Display name at issuance time.
    pub name: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The authenticated user's ID as a typed value.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Issue a bearer token for a user.
///
/// # Errors
///
/// Returns `AuthError::Token` if encoding fails.
pub fn issue_token(user: &User, secret: &SecretString) -> Result<String, AuthError> {
    let claims = Claims {
        sub: user.id.as_i32(),
        email: user.email.as_str().to_owned(),
        name: user.name.clone(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )?;

    Ok(token)
}

/// Verify a bearer token and return its claims.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token is malformed, has a bad
/// signature, or is expired.
pub fn verify_token(token: &str, secret: &SecretString) -> Result<Claims, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(data.claims)
}

/// Authentication service.
///
/// Handles user registration and login against the `users` table.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt_secret: &'a SecretString,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt_secret: &'a SecretString) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
        }
    }

    /// Register a new user with name, email, and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if the name is empty.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }

        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create_with_password(name.trim(), &email, &password_hash, "user")
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password, returning the user and a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = issue_token(&user, self.jwt_secret)?;
        Ok((user, token))
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn test_user() -> User {
        User {
            id: UserId::new(12),
            name: "Thandi".to_owned(),
            email: Email::parse("thandi@example.com").unwrap(),
            role: "user".to_owned(),
            created_at: Utc::now(),
        }
    }

    fn secret() -> SecretString {
        SecretString::from("kY8#mQ2$vN5@pL7!xR3&wT9*zB4^cF6j")
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn token_round_trip() {
        let user = test_user();
        let secret = secret();

        let token = issue_token(&user, &secret).unwrap();
        let claims = verify_token(&token, &secret).unwrap();

        assert_eq!(claims.user_id(), user.id);
        assert_eq!(claims.email, "thandi@example.com");
        assert_eq!(claims.name, "Thandi");
    }

    #[test]
    fn token_fails_with_wrong_secret() {
        let token = issue_token(&test_user(), &secret()).unwrap();
        let other = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");

        assert!(matches!(
            verify_token(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = test_user();
        let secret = secret();

        let claims = Claims {
            sub: user.id.as_i32(),
            email: user.email.as_str().to_owned(),
            name: user.name.clone(),
            exp: (Utc::now() - chrono::Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verify_token(&token, &secret),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            verify_token("not.a.token", &secret()),
            Err(AuthError::InvalidToken)
        ));
    }
}

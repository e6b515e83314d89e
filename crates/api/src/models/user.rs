//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pomelo_core::{Email, UserId};

/// A Pomelo user account.
///
/// The password hash is deliberately not part of this type; it only travels
/// through [`crate::db::users::UserRepository::get_password_hash`].
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Coarse role label ("user" or "admin").
    pub role: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

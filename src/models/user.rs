//! User and profile models for storage and API.

use serde::{Deserialize, Serialize};

/// User account record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated id (also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (unique across all users)
    pub email: String,
    /// Argon2 PHC hash; None for accounts created via a social provider
    pub password_hash: Option<String>,
    /// Provider-issued identifier, set once the account is linked to a provider
    pub social_id: Option<String>,
    /// When the account was created (RFC 3339)
    pub created_at: String,
    /// Last modification timestamp (RFC 3339)
    pub updated_at: String,
}

/// Profile owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user's id (also used as document ID)
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Avatar URL supplied by a provider, if any
    pub avatar_url: Option<String>,
}

/// Public view of a user, safe to return to clients.
///
/// Never carries the password hash or the social id.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub name: String,
    pub email: String,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            id: user.id.clone(),
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
        }
    }
}

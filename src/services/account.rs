// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account service: local registration and provider-identity upserts.

use crate::db::Db;
use crate::error::AppError;
use crate::models::{Profile, RemoteIdentity, User};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Validated input for local registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Business logic for creating and linking accounts.
#[derive(Clone)]
pub struct AccountService {
    db: Db,
}

impl AccountService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Register a local account.
    ///
    /// Creates one User and one Profile; fails with
    /// [`AppError::EmailTaken`] when the email is already claimed.
    pub async fn register(&self, input: NewAccount) -> Result<User, AppError> {
        let password_hash = hash_password(&input.password)?;
        let now = chrono::Utc::now().to_rfc3339();

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            password_hash: Some(password_hash),
            social_id: None,
            created_at: now.clone(),
            updated_at: now,
        };
        let profile = Profile {
            user_id: user.id.clone(),
            first_name: input.first_name,
            last_name: input.last_name,
            avatar_url: None,
        };

        self.db.create_account(&user, &profile).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Upsert a user from a provider-authenticated identity, keyed by email.
    ///
    /// First login for an email creates the account; later logins refresh
    /// the social id and overwrite the profile with the latest provider
    /// payload (last-write-wins). Replaying one payload is idempotent.
    pub async fn authenticate_identity(&self, identity: &RemoteIdentity) -> Result<User, AppError> {
        if let Some(user) = self.db.find_user_by_email(&identity.email).await? {
            return self.link_identity(user, identity).await;
        }

        let now = chrono::Utc::now().to_rfc3339();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: identity.full_name(),
            email: identity.email.clone(),
            password_hash: None,
            social_id: Some(identity.provider_id.clone()),
            created_at: now.clone(),
            updated_at: now,
        };
        let profile = profile_from_identity(&user.id, identity);

        match self.db.create_account(&user, &profile).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %user.id,
                    provider = %identity.provider,
                    "User created from provider identity"
                );
                Ok(user)
            }
            Err(AppError::EmailTaken) => {
                // Lost a race with a concurrent login for the same email;
                // the account exists now, so take the update path.
                let existing = self
                    .db
                    .find_user_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| {
                        AppError::Database("email index points at a missing user".to_string())
                    })?;
                self.link_identity(existing, identity).await
            }
            Err(e) => Err(e),
        }
    }

    /// Refresh an existing user's social id and profile from an identity.
    async fn link_identity(
        &self,
        mut user: User,
        identity: &RemoteIdentity,
    ) -> Result<User, AppError> {
        user.social_id = Some(identity.provider_id.clone());
        user.updated_at = chrono::Utc::now().to_rfc3339();
        self.db.update_user(&user).await?;
        self.db
            .set_profile(&profile_from_identity(&user.id, identity))
            .await?;

        tracing::info!(
            user_id = %user.id,
            provider = %identity.provider,
            "Provider identity linked"
        );

        Ok(user)
    }
}

fn profile_from_identity(user_id: &str, identity: &RemoteIdentity) -> Profile {
    Profile {
        user_id: user_id.to_string(),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        avatar_url: identity.avatar_url.clone(),
    }
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

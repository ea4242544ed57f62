// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (account storage, keyed by generated id)
//! - Email index (uniqueness guard, keyed by url-encoded email)
//! - Profiles (keyed by owning user id)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Profile, User};
use serde::{Deserialize, Serialize};

/// Firestore store backend.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

/// Index document mapping an email to the owning user id.
///
/// Firestore has no unique constraints, so account creation claims the
/// email's index document inside a transaction before writing the user.
#[derive(Debug, Serialize, Deserialize)]
struct EmailIndexEntry {
    user_id: String,
}

/// Document id for an email index entry.
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by email through the index collection.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let entry: Option<EmailIndexEntry> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USERS_BY_EMAIL)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match entry {
            Some(entry) => self.get_user(&entry.user_id).await,
            None => Ok(None),
        }
    }

    /// Atomically create a user, its email index entry, and its profile.
    ///
    /// A transaction claims the email index document first; if another
    /// request claimed it concurrently the commit fails and the email
    /// stays unique. Returns [`AppError::EmailTaken`] when already claimed.
    pub async fn create_account(&self, user: &User, profile: &Profile) -> Result<(), AppError> {
        let email_key = email_doc_id(&user.email);

        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the index entry within the transaction; this registers the
        // document for conflict detection.
        let existing: Option<EmailIndexEntry> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USERS_BY_EMAIL)
            .obj()
            .one(&email_key)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read email index in transaction: {}", e))
            })?;

        if existing.is_some() {
            let _ = transaction.rollback().await;
            return Err(AppError::EmailTaken);
        }

        let index_entry = EmailIndexEntry {
            user_id: user.id.clone(),
        };

        self.client
            .fluent()
            .update()
            .in_col(collections::USERS_BY_EMAIL)
            .document_id(&email_key)
            .object(&index_entry)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add email index to transaction: {}", e))
            })?;

        self.client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add user to transaction: {}", e)))?;

        self.client
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add profile to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(user_id = %user.id, "Account created");

        Ok(())
    }

    /// Overwrite an existing user record.
    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get the profile owned by a user.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a user's profile.
    pub async fn set_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

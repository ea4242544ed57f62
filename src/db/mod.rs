//! User/profile store with two backends.
//!
//! Production runs against Firestore; local development and tests use an
//! in-memory store with the same semantics (unique email, upsert by id).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Profile, User};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email uniqueness index (keyed by url-encoded email)
    pub const USERS_BY_EMAIL: &str = "users_by_email";
    pub const PROFILES: &str = "profiles";
}

/// Handle to the user/profile store.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreStore),
    Memory(Arc<MemoryStore>),
}

impl Db {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreStore::new(project_id).await?),
        })
    }

    /// Create an in-memory store (local development and tests).
    pub fn new_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.get_user(id).await,
            Backend::Memory(store) => Ok(store.get_user(id)),
        }
    }

    /// Look up a user by email through the uniqueness index.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.find_user_by_email(email).await,
            Backend::Memory(store) => Ok(store.find_user_by_email(email)),
        }
    }

    /// Create a user together with its profile.
    ///
    /// Fails with [`AppError::EmailTaken`] if the email is already claimed;
    /// concurrent attempts for one email serialize through the store so at
    /// most one of them succeeds.
    pub async fn create_account(&self, user: &User, profile: &Profile) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.create_account(user, profile).await,
            Backend::Memory(store) => store.create_account(user, profile),
        }
    }

    /// Overwrite an existing user record.
    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.update_user(user).await,
            Backend::Memory(store) => Ok(store.update_user(user)),
        }
    }

    /// Get the profile owned by a user.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.get_profile(user_id).await,
            Backend::Memory(store) => Ok(store.get_profile(user_id)),
        }
    }

    /// Create or overwrite a user's profile (last-write-wins).
    pub async fn set_profile(&self, profile: &Profile) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.set_profile(profile).await,
            Backend::Memory(store) => Ok(store.set_profile(profile)),
        }
    }
}

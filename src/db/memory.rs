// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store backend.
//!
//! Backs local development and the integration test suite. Semantics match
//! the Firestore backend: upsert by document id, unique email enforced
//! atomically on account creation.

use crate::error::AppError;
use crate::models::{Profile, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory user/profile store.
#[derive(Default)]
pub struct MemoryStore {
    /// Users keyed by id
    users: DashMap<String, User>,
    /// Email uniqueness index: email -> user id
    emails: DashMap<String, String>,
    /// Profiles keyed by owning user id
    profiles: DashMap<String, Profile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let id = self.emails.get(email)?.value().clone();
        self.get_user(&id)
    }

    /// Create a user and profile, claiming the email atomically.
    ///
    /// The entry guard on the email index serializes concurrent attempts
    /// for the same email; the loser observes the occupied entry.
    pub fn create_account(&self, user: &User, profile: &Profile) -> Result<(), AppError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::EmailTaken),
            Entry::Vacant(entry) => {
                entry.insert(user.id.clone());
                self.users.insert(user.id.clone(), user.clone());
                self.profiles.insert(profile.user_id.clone(), profile.clone());
                Ok(())
            }
        }
    }

    pub fn update_user(&self, user: &User) {
        self.users.insert(user.id.clone(), user.clone());
    }

    pub fn get_profile(&self, user_id: &str) -> Option<Profile> {
        self.profiles.get(user_id).map(|entry| entry.value().clone())
    }

    pub fn set_profile(&self, profile: &Profile) {
        self.profiles.insert(profile.user_id.clone(), profile.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: None,
            social_id: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn sample_profile(user_id: &str) -> Profile {
        Profile {
            user_id: user_id.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            avatar_url: None,
        }
    }

    #[test]
    fn create_and_lookup() {
        let store = MemoryStore::new();
        store
            .create_account(&sample_user("u1", "a@example.com"), &sample_profile("u1"))
            .unwrap();

        assert_eq!(store.get_user("u1").unwrap().email, "a@example.com");
        assert_eq!(store.find_user_by_email("a@example.com").unwrap().id, "u1");
        assert_eq!(store.get_profile("u1").unwrap().first_name, "Test");
        assert!(store.find_user_by_email("b@example.com").is_none());
    }

    #[test]
    fn duplicate_email_rejected() {
        let store = MemoryStore::new();
        store
            .create_account(&sample_user("u1", "a@example.com"), &sample_profile("u1"))
            .unwrap();

        let err = store
            .create_account(&sample_user("u2", "a@example.com"), &sample_profile("u2"))
            .unwrap_err();
        assert!(matches!(err, AppError::EmailTaken));

        // The losing insert must not clobber the winner.
        assert_eq!(store.find_user_by_email("a@example.com").unwrap().id, "u1");
        assert!(store.get_user("u2").is_none());
    }

    #[test]
    fn update_overwrites_fields() {
        let store = MemoryStore::new();
        let mut user = sample_user("u1", "a@example.com");
        store.create_account(&user, &sample_profile("u1")).unwrap();

        user.social_id = Some("provider-123".to_string());
        store.update_user(&user);

        assert_eq!(
            store.get_user("u1").unwrap().social_id.as_deref(),
            Some("provider-123")
        );
    }
}

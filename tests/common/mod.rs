// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use gatehouse_api::config::Config;
use gatehouse_api::db::Db;
use gatehouse_api::models::{Provider, RemoteIdentity};
use gatehouse_api::routes::create_router;
use gatehouse_api::services::{AccountService, IdentityProvider, StaticProvider};
use gatehouse_api::AppState;
use std::sync::Arc;

/// Create a test app over an in-memory store with unreachable providers.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_full(
        Db::new_memory(),
        Config::test_default(),
        Arc::new(StaticProvider::failing(Provider::Google)),
        Arc::new(StaticProvider::failing(Provider::Facebook)),
    )
}

/// Test app whose matching provider authenticates every code as `identity`.
#[allow(dead_code)]
pub fn create_test_app_with_identity(identity: RemoteIdentity) -> (axum::Router, Arc<AppState>) {
    create_test_app_on_db(Db::new_memory(), identity)
}

/// Like [`create_test_app_with_identity`] but reusing an existing store,
/// for tests that replay callbacks across app instances.
#[allow(dead_code)]
pub fn create_test_app_on_db(db: Db, identity: RemoteIdentity) -> (axum::Router, Arc<AppState>) {
    let (google, facebook): (Arc<dyn IdentityProvider>, Arc<dyn IdentityProvider>) =
        match identity.provider {
            Provider::Google => (
                Arc::new(StaticProvider::returning(identity)),
                Arc::new(StaticProvider::failing(Provider::Facebook)),
            ),
            Provider::Facebook => (
                Arc::new(StaticProvider::failing(Provider::Google)),
                Arc::new(StaticProvider::returning(identity)),
            ),
        };
    create_test_app_full(db, Config::test_default(), google, facebook)
}

/// Test app with a custom frontend URL (cookie attribute tests).
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_full(
        Db::new_memory(),
        config,
        Arc::new(StaticProvider::returning(john_doe_google())),
        Arc::new(StaticProvider::failing(Provider::Facebook)),
    )
}

/// Base constructor shared by the helpers above.
#[allow(dead_code)]
pub fn create_test_app_full(
    db: Db,
    config: Config,
    google: Arc<dyn IdentityProvider>,
    facebook: Arc<dyn IdentityProvider>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        accounts: AccountService::new(db.clone()),
        db,
        google,
        facebook,
    });

    (create_router(state.clone()), state)
}

/// Create a JWT the way the auth routes do (mirrors middleware/auth.rs).
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    gatehouse_api::middleware::auth::create_jwt(user_id, signing_key)
        .expect("Failed to create JWT")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body should be JSON")
}

/// The Google identity used by the original acceptance fixtures.
#[allow(dead_code)]
pub fn john_doe_google() -> RemoteIdentity {
    RemoteIdentity {
        provider: Provider::Google,
        provider_id: "google-id-12345".to_string(),
        email: "john.doe@example.com".to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        avatar_url: Some("https://lh3.googleusercontent.com/a-/AOh14Gh2G_YHMAI".to_string()),
    }
}

/// The Facebook identity used by the original acceptance fixtures.
#[allow(dead_code)]
pub fn john_doe_facebook() -> RemoteIdentity {
    RemoteIdentity {
        provider: Provider::Facebook,
        provider_id: "10220927895907350".to_string(),
        email: "john.doe@example.com".to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        avatar_url: Some(
            "https://graph.facebook.com/v3.3/10220927895907350/picture?width=1920".to_string(),
        ),
    }
}

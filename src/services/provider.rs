// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider abstraction.
//!
//! Each provider implements the same capability set: build an authorization
//! URL, exchange a callback code for an access token, and fetch the remote
//! identity normalized to [`RemoteIdentity`].

use crate::error::AppError;
use crate::models::{Provider, RemoteIdentity};
use async_trait::async_trait;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> Provider;

    /// Authorization URL the browser is redirected to.
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String;

    /// Exchange an authorization code for a provider access token.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, AppError>;

    /// Fetch the remote identity for an access token.
    async fn fetch_identity(&self, access_token: &str) -> Result<RemoteIdentity, AppError>;
}

/// Provider stub that skips the remote calls and returns a fixed identity.
///
/// This is intended for deterministic local/integration tests.
pub struct StaticProvider {
    provider: Provider,
    identity: Option<RemoteIdentity>,
}

impl StaticProvider {
    /// Stub that authenticates every code as the given identity.
    pub fn returning(identity: RemoteIdentity) -> Self {
        Self {
            provider: identity.provider,
            identity: Some(identity),
        }
    }

    /// Stub whose remote side is unavailable.
    pub fn failing(provider: Provider) -> Self {
        Self {
            provider,
            identity: None,
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "https://provider.invalid/authorize?redirect_uri={}&state={}",
            urlencoding::encode(redirect_uri),
            state
        )
    }

    async fn exchange_code(&self, _code: &str, _redirect_uri: &str) -> Result<String, AppError> {
        if self.identity.is_none() {
            return Err(AppError::Provider(format!(
                "{} token endpoint unavailable",
                self.provider
            )));
        }
        Ok("static-access-token".to_string())
    }

    async fn fetch_identity(&self, _access_token: &str) -> Result<RemoteIdentity, AppError> {
        self.identity.clone().ok_or_else(|| {
            AppError::Provider(format!("{} identity endpoint unavailable", self.provider))
        })
    }
}

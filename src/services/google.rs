// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth client.
//!
//! Exchanges authorization codes at the Google token endpoint and reads the
//! OIDC userinfo document, mapping `sub`/`given_name`/`family_name`/`picture`
//! onto the canonical identity record.

use crate::error::AppError;
use crate::models::{Provider, RemoteIdentity};
use crate::services::provider::IdentityProvider;
use async_trait::async_trait;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Raw OIDC userinfo payload.
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl GoogleProvider {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile&state={}",
            AUTHORIZE_URL,
            self.client_id,
            urlencoding::encode(redirect_uri),
            state
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Google token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Google token endpoint returned HTTP {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Google token JSON parse error: {}", e)))?;

        Ok(token.access_token)
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<RemoteIdentity, AppError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Google userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Google userinfo returned HTTP {}: {}",
                status, body
            )));
        }

        let info: GoogleUserInfo = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Google userinfo JSON parse error: {}", e)))?;

        identity_from_userinfo(info)
    }
}

/// Normalize a userinfo payload to the canonical identity record.
pub fn identity_from_userinfo(info: GoogleUserInfo) -> Result<RemoteIdentity, AppError> {
    let email = info
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Provider("Google identity is missing an email".to_string()))?;

    Ok(RemoteIdentity {
        provider: Provider::Google,
        provider_id: info.sub,
        email,
        first_name: info.given_name.unwrap_or_default(),
        last_name: info.family_name.unwrap_or_default(),
        avatar_url: info.picture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn userinfo_maps_to_identity() {
        let info: GoogleUserInfo = serde_json::from_value(serde_json::json!({
            "sub": "google-id-12345",
            "email": "john.doe@example.com",
            "given_name": "John",
            "family_name": "Doe",
            "picture": "https://lh3.googleusercontent.com/a-/AOh14Gh2G_YHMAI"
        }))
        .unwrap();

        let identity = identity_from_userinfo(info).unwrap();
        assert_eq!(identity.provider, Provider::Google);
        assert_eq!(identity.provider_id, "google-id-12345");
        assert_eq!(identity.email, "john.doe@example.com");
        assert_eq!(identity.first_name, "John");
        assert_eq!(identity.last_name, "Doe");
        assert_eq!(
            identity.avatar_url.as_deref(),
            Some("https://lh3.googleusercontent.com/a-/AOh14Gh2G_YHMAI")
        );
    }

    #[test]
    fn userinfo_without_email_is_rejected() {
        let info: GoogleUserInfo = serde_json::from_value(serde_json::json!({
            "sub": "google-id-12345",
            "given_name": "John"
        }))
        .unwrap();

        assert!(matches!(
            identity_from_userinfo(info),
            Err(AppError::Provider(_))
        ));
    }
}

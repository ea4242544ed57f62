// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facebook OAuth client.
//!
//! The Graph API exposes a single top-level `name`; the adapter splits it
//! into first/last at the first space before it reaches the upsert logic.

use crate::error::AppError;
use crate::models::{Provider, RemoteIdentity};
use crate::services::provider::IdentityProvider;
use async_trait::async_trait;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const TOKEN_URL: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const ME_URL: &str = "https://graph.facebook.com/v19.0/me";

/// Facebook OAuth client.
#[derive(Clone)]
pub struct FacebookProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Raw Graph API `/me` payload.
#[derive(Debug, Deserialize)]
pub struct FacebookUserInfo {
    id: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<FacebookPicture>,
}

#[derive(Debug, Deserialize)]
struct FacebookPicture {
    data: Option<FacebookPictureData>,
}

#[derive(Debug, Deserialize)]
struct FacebookPictureData {
    url: Option<String>,
}

impl FacebookProvider {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl IdentityProvider for FacebookProvider {
    fn provider(&self) -> Provider {
        Provider::Facebook
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=email,public_profile&state={}",
            AUTHORIZE_URL,
            self.client_id,
            urlencoding::encode(redirect_uri),
            state
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, AppError> {
        let response = self
            .http
            .get(TOKEN_URL)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Facebook token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Facebook token endpoint returned HTTP {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Facebook token JSON parse error: {}", e)))?;

        Ok(token.access_token)
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<RemoteIdentity, AppError> {
        let response = self
            .http
            .get(ME_URL)
            .query(&[("fields", "id,name,email,picture{url}")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Facebook profile request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Facebook profile endpoint returned HTTP {}: {}",
                status, body
            )));
        }

        let info: FacebookUserInfo = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Facebook profile JSON parse error: {}", e)))?;

        identity_from_graph(info)
    }
}

/// Normalize a Graph API payload to the canonical identity record.
pub fn identity_from_graph(info: FacebookUserInfo) -> Result<RemoteIdentity, AppError> {
    let email = info
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Provider("Facebook identity is missing an email".to_string()))?;

    let (first_name, last_name) = split_name(info.name.as_deref().unwrap_or_default());

    Ok(RemoteIdentity {
        provider: Provider::Facebook,
        provider_id: info.id,
        email,
        first_name,
        last_name,
        avatar_url: info
            .picture
            .and_then(|picture| picture.data)
            .and_then(|data| data.url),
    })
}

/// Split a display name into (first, last) at the first space.
fn split_name(name: &str) -> (String, String) {
    let mut parts = name.trim().splitn(2, ' ');
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.next().unwrap_or_default().trim().to_string();
    (first, last)
}

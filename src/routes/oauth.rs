// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social login routes (Google, Facebook).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::Provider;
use crate::services::IdentityProvider;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/auth/{provider}", get(oauth_start))
        .route("/api/v1/auth/{provider}/callback", get(oauth_callback))
        .route("/api/v1/auth/logout", post(logout))
}

/// Query parameters for starting an OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses the configured frontend URL.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start the OAuth flow - redirect to the provider's authorization page.
async fn oauth_start(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(params): Query<AuthStartParams>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    let client = resolve_provider(&state, &provider)?;

    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&frontend_url, &state.config.oauth_state_key)?;
    let callback = callback_url(&headers, client.provider());

    tracing::info!(
        provider = %client.provider(),
        frontend_url = %frontend_url,
        "Starting OAuth flow, redirecting to provider"
    );

    Ok(Redirect::temporary(&client.authorize_url(&callback, &oauth_state)))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Authentication success body.
#[derive(Serialize)]
pub struct AuthSuccess {
    pub status: String,
    pub message: String,
}

/// OAuth callback - exchange the code, upsert the user, establish a session.
async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    headers: axum::http::HeaderMap,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let client = resolve_provider(&state, &provider)?;

    // Check for OAuth errors reported by the provider
    if let Some(error) = params.error {
        tracing::warn!(provider = %client.provider(), error = %error, "OAuth error from provider");
        return Err(AppError::Provider(format!(
            "{} reported an error: {}",
            client.provider(),
            error
        )));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    // The original clients authenticate statelessly, so a bad state parameter
    // is logged rather than rejected.
    if let Some(oauth_state) = params.state.as_deref() {
        if verify_and_decode_state(oauth_state, &state.config.oauth_state_key).is_none() {
            tracing::warn!(
                provider = %client.provider(),
                "Invalid or tampered state parameter on callback"
            );
        }
    }

    let callback = callback_url(&headers, client.provider());

    tracing::info!(provider = %client.provider(), "Exchanging authorization code");

    let provider_token = client.exchange_code(&code, &callback).await?;
    let identity = client.fetch_identity(&provider_token).await?;

    let user = state.accounts.authenticate_identity(&identity).await?;

    tracing::info!(
        provider = %client.provider(),
        user_id = %user.id,
        "OAuth successful, user authenticated"
    );

    let jwt = create_jwt(&user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let body = AuthSuccess {
        status: "success".to_string(),
        message: "User successfully authenticated".to_string(),
    };

    Ok((jar.add(session_cookie(&state.config, jwt)), Json(body)))
}

/// Logout - clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        jar.add(removal_cookie(&state.config)),
    )
}

/// Resolve a path segment to the configured provider client.
fn resolve_provider(state: &AppState, name: &str) -> Result<Arc<dyn IdentityProvider>> {
    let provider: Provider = name
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown identity provider: {}", name)))?;
    Ok(state.provider_client(provider))
}

/// Build the callback URL for a provider from the request Host header.
fn callback_url(headers: &axum::http::HeaderMap, provider: Provider) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/api/v1/auth/{}/callback", scheme, host, provider)
}

/// Session cookie carrying the freshly minted access token.
fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    if config.frontend_url.starts_with("https://") {
        cookie.set_secure(true);
    }
    cookie
}

/// Removal cookie matching the creation attributes, with Max-Age=0.
fn removal_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new());
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

/// Sign the frontend URL and a timestamp into an OAuth state parameter.
fn sign_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Data payload: "frontend_url|timestamp_hex"
    let state_payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(state_payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    // Combine payload + signature: "payload|signature_hex", base64 encoded
    let signed_state = format!("{}|{}", state_payload, hex::encode(signature));

    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify HMAC signature and decode the frontend URL from the OAuth state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_verify_state() {
        let secret = b"secret_key";
        let frontend_url = "https://example.com";

        let state = sign_state(frontend_url, secret).unwrap();
        let result = verify_and_decode_state(&state, secret);
        assert_eq!(result, Some(frontend_url.to_string()));
    }

    #[test]
    fn test_verify_and_decode_state_invalid_signature() {
        let secret = b"secret_key";
        let frontend_url = "https://example.com";
        let timestamp = 1234567890u128;

        let payload = format!("{}|{:x}", frontend_url, timestamp);
        let signature = "invalid_signature";

        let state_data = format!("{}|{}", payload, signature);
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        let result = verify_and_decode_state(&encoded_state, secret);
        assert_eq!(result, None);
    }

    #[test]
    fn test_verify_and_decode_state_wrong_secret() {
        let secret = b"secret_key";
        let wrong_secret = b"wrong_key";
        let frontend_url = "https://example.com";

        let state = sign_state(frontend_url, secret).unwrap();
        let result = verify_and_decode_state(&state, wrong_secret);
        assert_eq!(result, None);
    }

    #[test]
    fn test_verify_and_decode_state_malformed() {
        let secret = b"secret_key";
        let encoded_state = URL_SAFE_NO_PAD.encode("invalid|format");
        let result = verify_and_decode_state(&encoded_state, secret);
        assert_eq!(result, None);
    }

    #[test]
    fn test_callback_url_scheme_sniffing() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::HOST,
            "localhost:8080".parse().unwrap(),
        );
        assert_eq!(
            callback_url(&headers, Provider::Google),
            "http://localhost:8080/api/v1/auth/google/callback"
        );

        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::HOST,
            "api.gatehouse.dev".parse().unwrap(),
        );
        assert_eq!(
            callback_url(&headers, Provider::Facebook),
            "https://api.gatehouse.dev/api/v1/auth/facebook/callback"
        );
    }
}

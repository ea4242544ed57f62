//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Facebook app ID (public)
    pub facebook_client_id: String,
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    /// GCP project ID; None selects the in-memory store
    pub gcp_project_id: Option<String>,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Facebook app secret
    pub facebook_client_secret: String,
    /// JWT signing key for access tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing OAuth state parameters (raw bytes)
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, secrets can be set via a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            facebook_client_id: env::var("FACEBOOK_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("FACEBOOK_CLIENT_ID"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").ok(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            facebook_client_secret: env::var("FACEBOOK_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FACEBOOK_CLIENT_SECRET"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_google_client_id".to_string(),
            facebook_client_id: "test_facebook_client_id".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: None,
            port: 8080,
            google_client_secret: "test_google_secret".to_string(),
            facebook_client_secret: "test_facebook_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_state_key_32_bytes_minimum".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

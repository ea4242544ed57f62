// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gatehouse API Server
//!
//! Serves local registration and Google/Facebook social login, backed by a
//! user/profile store and stateless JWT access tokens.

use gatehouse_api::{
    config::Config,
    db::Db,
    services::{AccountService, FacebookProvider, GoogleProvider},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Gatehouse API");

    // Initialize the user/profile store
    let db = match &config.gcp_project_id {
        Some(project_id) => Db::connect(project_id)
            .await
            .expect("Failed to connect to Firestore"),
        None => {
            tracing::warn!("GCP_PROJECT_ID not set, using in-memory store");
            Db::new_memory()
        }
    };

    // Initialize identity providers
    let google = Arc::new(GoogleProvider::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    ));
    let facebook = Arc::new(FacebookProvider::new(
        config.facebook_client_id.clone(),
        config.facebook_client_secret.clone(),
    ));
    tracing::info!("Identity providers initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        accounts: AccountService::new(db.clone()),
        db,
        google,
        facebook,
    });

    // Build router
    let app = gatehouse_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gatehouse_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

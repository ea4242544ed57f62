// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Gatehouse: authentication API for local and social sign-in
//!
//! This crate provides the backend API for registering accounts with a
//! password and for authenticating through Google or Facebook, keeping one
//! user and profile per email.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use models::Provider;
use services::{AccountService, IdentityProvider};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub accounts: AccountService,
    pub google: Arc<dyn IdentityProvider>,
    pub facebook: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Client for one of the configured identity providers.
    pub fn provider_client(&self, provider: Provider) -> Arc<dyn IdentityProvider> {
        match provider {
            Provider::Google => self.google.clone(),
            Provider::Facebook => self.facebook.clone(),
        }
    }
}

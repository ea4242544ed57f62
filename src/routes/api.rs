// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::PublicUser;
use crate::AppState;
use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/auth/me", get(get_me))
}

/// Current user response.
#[derive(Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
    pub profile: Option<ProfileResponse>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

/// Get the current user and profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))?;

    let profile = state.db.get_profile(&user.id).await?;

    Ok(Json(MeResponse {
        user: PublicUser::from(&user),
        profile: profile.map(|p| ProfileResponse {
            first_name: p.first_name,
            last_name: p.last_name,
            avatar_url: p.avatar_url,
        }),
    }))
}

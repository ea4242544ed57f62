// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local registration route.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, FieldErrors, Result};
use crate::middleware::auth::create_jwt;
use crate::models::PublicUser;
use crate::services::NewAccount;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/auth/register", post(register))
}

/// Registration payload.
///
/// Presence checks are expressed through the validator derive; password
/// strength and confirmation are checked separately so their messages can
/// land under the `password` key the way API clients expect.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "required"), email(code = "email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

/// Successful registration body.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub status_code: u16,
    pub data: RegisterData,
}

#[derive(Serialize)]
pub struct RegisterData {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub user: PublicUser,
}

/// Register a new user and mint a fresh access token.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let errors = validation_errors(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = state
        .accounts
        .register(NewAccount {
            name: req.name,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let body = RegisterResponse {
        message: "User successfully registered".to_string(),
        status_code: StatusCode::CREATED.as_u16(),
        data: RegisterData {
            access_token: token,
            user: PublicUser::from(&user),
        },
    };

    Ok((StatusCode::CREATED, Json(body)))
}

/// Field label for messages ("first_name" -> "first name").
fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

/// Collect per-field messages for a registration payload.
///
/// A missing field reports only its required message, matching the
/// behavior the API's clients were built against.
fn validation_errors(req: &RegisterRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(derive_errors) = req.validate() {
        for (field, field_errors) in derive_errors.field_errors() {
            let field = field.to_string();
            let codes: Vec<&str> = field_errors.iter().map(|e| e.code.as_ref()).collect();

            let messages = errors.entry(field.clone()).or_default();
            if codes.contains(&"required") {
                messages.push(format!("The {} field is required.", field_label(&field)));
            } else if codes.contains(&"email") {
                messages.push("The email field must be a valid email address.".to_string());
            }
        }
    }

    // Strength and confirmation only apply once a password was supplied.
    if !req.password.is_empty() {
        let policy = password_policy_messages(&req.password);
        if !policy.is_empty() {
            errors.entry("password".to_string()).or_default().extend(policy);
        }
        if req.password_confirmation != req.password {
            errors
                .entry("password".to_string())
                .or_default()
                .push("The password field confirmation does not match.".to_string());
        }
    }

    errors
}

/// Password policy: at least 8 characters, mixed case, and a digit.
fn password_policy_messages(password: &str) -> Vec<String> {
    let mut messages = Vec::new();

    if password.chars().count() < 8 {
        messages.push("The password field must be at least 8 characters.".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) || !password.chars().any(|c| c.is_lowercase()) {
        messages.push(
            "The password field must contain at least one uppercase and one lowercase letter."
                .to_string(),
        );
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        messages.push("The password field must contain at least one number.".to_string());
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            name: "Test User".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "testuser@gmail.com".to_string(),
            password: "Ed8M7s19e".to_string(),
            password_confirmation: "Ed8M7s19e".to_string(),
        }
    }

    #[test]
    fn valid_request_has_no_errors() {
        assert!(validation_errors(&valid_request()).is_empty());
    }

    #[test]
    fn empty_email_reports_only_required() {
        let mut req = valid_request();
        req.email = String::new();

        let errors = validation_errors(&req);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("email").unwrap(),
            &vec!["The email field is required.".to_string()]
        );
    }

    #[test]
    fn malformed_email_reports_format_message() {
        let mut req = valid_request();
        req.email = "not-an-email".to_string();

        let errors = validation_errors(&req);
        assert_eq!(
            errors.get("email").unwrap(),
            &vec!["The email field must be a valid email address.".to_string()]
        );
    }

    #[test]
    fn missing_fields_use_spaced_labels() {
        let mut req = valid_request();
        req.first_name = String::new();
        req.last_name = String::new();

        let errors = validation_errors(&req);
        assert_eq!(
            errors.get("first_name").unwrap(),
            &vec!["The first name field is required.".to_string()]
        );
        assert_eq!(
            errors.get("last_name").unwrap(),
            &vec!["The last name field is required.".to_string()]
        );
    }

    #[test]
    fn weak_password_lists_each_violation() {
        let mut req = valid_request();
        req.password = "abc".to_string();
        req.password_confirmation = "abc".to_string();

        let messages = errors_for_password(&req);
        assert!(messages.contains(&"The password field must be at least 8 characters.".to_string()));
        assert!(messages.contains(
            &"The password field must contain at least one uppercase and one lowercase letter."
                .to_string()
        ));
        assert!(messages.contains(&"The password field must contain at least one number.".to_string()));
    }

    #[test]
    fn confirmation_mismatch_lands_under_password() {
        let mut req = valid_request();
        req.password_confirmation = "Different1".to_string();

        let errors = validation_errors(&req);
        assert_eq!(
            errors.get("password").unwrap(),
            &vec!["The password field confirmation does not match.".to_string()]
        );
    }

    #[test]
    fn empty_password_reports_only_required() {
        let mut req = valid_request();
        req.password = String::new();
        req.password_confirmation = String::new();

        let errors = validation_errors(&req);
        assert_eq!(
            errors.get("password").unwrap(),
            &vec!["The password field is required.".to_string()]
        );
    }

    fn errors_for_password(req: &RegisterRequest) -> Vec<String> {
        validation_errors(req)
            .remove("password")
            .unwrap_or_default()
    }
}

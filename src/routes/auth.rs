// ABOUTME: Authentication route handlers for registration, login, and profile updates
// ABOUTME: REST endpoints for doctor account management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! Authentication routes for account management
//!
//! Registration creates an active doctor account; login issues a session
//! token after checking credentials, the active flag, and subscription
//! expiry. Login failures are deliberately uniform ("Credenziali non
//! valide") so they reveal nothing about which part was wrong.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::context::ServerResources;
use crate::database::ProfileUpdate;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Registration request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with session token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: User,
}

/// Partial profile update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Build the authentication router
pub fn routes(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", put(update_profile))
        .with_state(resources)
}

/// Register a new doctor account
///
/// `POST /api/auth/register`
///
/// # Errors
///
/// Returns an error if validation fails or the username is taken.
async fn register(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    info!("Registration attempt for username: {}", request.username);

    if request.username.trim().is_empty() {
        return Err(AppError::invalid_input("Username must not be empty"));
    }
    if request.password.len() < 8 {
        return Err(AppError::invalid_input(
            "Password must be at least 8 characters",
        ));
    }

    if resources
        .database
        .get_user_by_username(request.username.trim())
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("Nome utente già in uso"));
    }

    let password_hash = hash_password(&request.password)?;
    let user = User::new(
        request.username.trim(),
        password_hash,
        request.first_name,
        request.last_name,
    );
    resources.database.create_user(&user).await?;

    info!(user_id = %user.id, "Account registered");
    Ok(Json(serde_json::json!({ "user": user })))
}

/// Log in and obtain a session token
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// Returns 401 for bad credentials, 403 for deactivated or expired
/// accounts.
async fn login(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = resources
        .database
        .get_user_by_username(&request.username)
        .await?
        .ok_or_else(|| AppError::auth_invalid("Credenziali non valide"))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(AppError::auth_invalid("Credenziali non valide"));
    }

    if !user.is_active {
        return Err(AppError::account_disabled().with_user_id(user.id));
    }
    if user.is_expired(Utc::now()) {
        return Err(AppError::auth_expired().with_user_id(user.id));
    }

    let token = resources.auth.generate_token(&user)?;
    let expires_at = resources.auth.token_expiry();

    info!(user_id = %user.id, "Login successful");
    Ok(Json(LoginResponse {
        token,
        expires_at: expires_at.to_rfc3339(),
        user,
    }))
}

/// Update the calling account's profile fields
///
/// `PUT /api/auth/profile`
///
/// Absent fields keep their current value.
///
/// # Errors
///
/// Returns an error if authentication or the update fails.
async fn update_profile(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let user = super::authenticate(&resources, &headers).await?;

    let updated = resources
        .database
        .update_user_profile(
            user.id,
            &ProfileUpdate {
                first_name: request.first_name,
                last_name: request.last_name,
                title: request.title,
                specialization: request.specialization,
                email: request.email,
                phone: request.phone,
            },
        )
        .await?;

    info!(user_id = %user.id, "Profile updated");
    Ok(Json(serde_json::json!({ "user": updated })))
}

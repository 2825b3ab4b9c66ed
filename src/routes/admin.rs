// ABOUTME: Admin console route handlers for doctor account lifecycle management
// ABOUTME: List/create accounts, toggle activation and expiry, reset passwords
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! Admin routes for account management
//!
//! All endpoints require the admin role. Admins create doctor accounts,
//! activate or deactivate them, set subscription expiry dates, and reset
//! passwords. Patient data is never reachable from here.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::context::ServerResources;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};

/// Account creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Activation and expiry update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub is_active: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Password reset request
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Build the admin router
pub fn routes(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id/status", put(update_status))
        .route("/users/:id/password", put(reset_password))
        .with_state(resources)
}

/// List every account with its status and expiry
///
/// `GET /api/admin/users`
///
/// # Errors
///
/// Returns 403 when the caller is not an admin.
async fn list_users(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    super::authenticate_admin(&resources, &headers).await?;
    let users = resources.database.list_users().await?;
    Ok(Json(users))
}

/// Create a doctor (or admin) account
///
/// `POST /api/admin/users`
///
/// # Errors
///
/// Returns 409 when the username is taken, 400 on invalid input.
async fn create_user(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let admin = super::authenticate_admin(&resources, &headers).await?;

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
    let mut user = User::new(
        request.username.trim(),
        password_hash,
        request.first_name,
        request.last_name,
    );
    user.role = request.role.unwrap_or(UserRole::User);
    user.expires_at = request.expires_at;
    resources.database.create_user(&user).await?;

    info!(admin_id = %admin.id, user_id = %user.id, "Account created by admin");
    Ok(Json(serde_json::json!({ "user": user })))
}

/// Toggle an account's active flag and set its subscription expiry
///
/// `PUT /api/admin/users/:id/status`
///
/// Deactivation takes effect on the account's next request; outstanding
/// tokens stop working immediately because every request re-checks the
/// stored flags.
///
/// # Errors
///
/// Returns 404 when the account does not exist.
async fn update_status(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let admin = super::authenticate_admin(&resources, &headers).await?;

    let updated = resources
        .database
        .update_user_status(user_id, request.is_active, request.expires_at)
        .await?
        .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))?;

    info!(
        admin_id = %admin.id,
        user_id = %user_id,
        is_active = request.is_active,
        "Account status updated"
    );
    Ok(Json(serde_json::json!({ "user": updated })))
}

/// Reset an account's password
///
/// `PUT /api/admin/users/:id/password`
///
/// # Errors
///
/// Returns 404 when the account does not exist, 400 on a short password.
async fn reset_password(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let admin = super::authenticate_admin(&resources, &headers).await?;

    if request.password.len() < 8 {
        return Err(AppError::invalid_input(
            "Password must be at least 8 characters",
        ));
    }

    let hash = hash_password(&request.password)?;
    let updated = resources.database.update_user_password(user_id, &hash).await?;
    if !updated {
        return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
    }

    info!(admin_id = %admin.id, user_id = %user_id, "Password reset by admin");
    Ok(Json(serde_json::json!({ "success": true })))
}

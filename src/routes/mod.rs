// ABOUTME: Route module organization for the Metabolica HTTP API
// ABOUTME: Domain routers plus the bearer-token authentication helpers they share
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! Route module for the Metabolica server
//!
//! Routes are organized by domain; each module contains request/response
//! DTOs and thin handlers that delegate to the database and risk core.

/// Admin console routes for account lifecycle management
pub mod admin;
/// Authentication and profile routes
pub mod auth;
/// Health check and readiness routes
pub mod health;
/// AI narrative generation routes
pub mod narrative;
/// Patient record and report routes
pub mod patients;

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Router;
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AuthManager;
use crate::context::ServerResources;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Assemble the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::routes(resources.clone()))
        .nest("/api/auth", auth::routes(resources.clone()))
        .nest("/api/patients", patients::routes(resources.clone()))
        .nest("/api/admin", admin::routes(resources.clone()))
        .nest("/api/ai", narrative::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Authenticate a request from its `Authorization: Bearer` header.
///
/// Validates the session token, loads the account, and re-checks its
/// active/expiry state so deactivation takes effect immediately.
pub(crate) async fn authenticate(
    resources: &ServerResources,
    headers: &HeaderMap,
) -> AppResult<User> {
    let token = bearer_token(headers)?;

    let claims = resources
        .auth
        .validate_token(token)
        .map_err(|e| AppError::auth_invalid(e.to_string()))?;

    let user_id = AuthManager::user_id_from_claims(&claims)
        .map_err(|_| AppError::auth_invalid("Invalid user ID in token"))?;

    let user = resources
        .database
        .get_user(user_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::auth_invalid("Unknown account"))?;

    if !user.is_active {
        return Err(AppError::account_disabled().with_user_id(user.id));
    }
    if user.is_expired(Utc::now()) {
        return Err(AppError::auth_expired().with_user_id(user.id));
    }

    Ok(user)
}

/// Authenticate and require the admin role.
pub(crate) async fn authenticate_admin(
    resources: &ServerResources,
    headers: &HeaderMap,
) -> AppResult<User> {
    let user = authenticate(resources, headers).await?;
    if !user.role.is_admin() {
        return Err(AppError::permission_denied("Admin role required").with_user_id(user.id));
    }
    Ok(user)
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(AppError::auth_required)
}

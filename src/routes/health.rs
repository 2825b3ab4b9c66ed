// ABOUTME: Liveness and readiness endpoints for deployment probes
// ABOUTME: /health always answers; /ready verifies database connectivity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! Health check routes

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::context::ServerResources;

/// Build the health router
pub fn routes(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(resources)
}

/// Liveness probe
///
/// `GET /health`
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe; verifies the database answers a trivial query
///
/// `GET /ready`
async fn ready(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
    match resources.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready" })),
        ),
        Err(e) => {
            tracing::error!("Readiness check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable" })),
            )
        }
    }
}

// ABOUTME: AI narrative route handler that turns an assessment into an Italian clinical summary
// ABOUTME: Degrades to 503 when no provider is configured; provider failures surface as 502
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! AI narrative generation route
//!
//! Takes a patient record, rebuilds the derived metrics, renders the
//! clinical prompt, and asks the configured provider for an Italian
//! narrative. The endpoint is stateless: the caller decides whether to
//! persist the returned text with the record.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info, warn};

use crate::context::ServerResources;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::PatientRecord;
use crate::risk::narrative::report_prompt;

/// Generated narrative response
#[derive(Debug, Serialize)]
pub struct NarrativeResponse {
    pub analysis: String,
}

/// Build the narrative router
pub fn routes(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/narrative", post(generate_narrative))
        .with_state(resources)
}

/// Generate an Italian clinical narrative for an assessment
///
/// `POST /api/ai/narrative`
///
/// # Errors
///
/// Returns 503 when no provider is configured and 502 when the provider
/// call fails.
async fn generate_narrative(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Json(mut record): Json<PatientRecord>,
) -> AppResult<impl IntoResponse> {
    let user = super::authenticate(&resources, &headers).await?;

    let provider = resources.narrative.as_ref().ok_or_else(|| {
        AppError::new(
            ErrorCode::ExternalServiceUnavailable,
            "Narrative generation is not configured",
        )
    })?;

    // Prompt numbers come from the calculator, never from the client
    record.recompute_metrics();
    let prompt = report_prompt(&record);

    let analysis = provider.generate(&prompt).await.map_err(|e| {
        warn!(user_id = %user.id, provider = provider.display_name(), "Narrative generation failed: {e}");
        e
    })?;

    info!(user_id = %user.id, provider = provider.display_name(), "Narrative generated");
    Ok(Json(NarrativeResponse { analysis }))
}

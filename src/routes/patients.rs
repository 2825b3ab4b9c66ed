// ABOUTME: Patient record route handlers: list, save, delete, and risk report
// ABOUTME: All endpoints are owner-scoped; derived metrics are always computed server-side
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! Patient record routes
//!
//! Every endpoint authenticates the caller and operates only on that
//! doctor's patients; a patient belonging to someone else behaves exactly
//! like a missing patient. Saving recomputes the derived metrics from the
//! raw measurements, discarding whatever the client sent in those fields.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::context::ServerResources;
use crate::errors::{AppError, AppResult};
use crate::models::PatientRecord;
use crate::risk::RiskReport;

/// Report response: the record plus its freshly computed interpretations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub patient: PatientRecord,
    pub interpretations: RiskReport,
}

/// Build the patients router
pub fn routes(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/", get(list_patients).post(save_patient))
        .route("/:id", axum::routing::delete(delete_patient))
        .route("/:id/report", get(patient_report))
        .with_state(resources)
}

/// List the calling doctor's patients with their latest assessments
///
/// `GET /api/patients`
///
/// # Errors
///
/// Returns an error if authentication or the query fails.
async fn list_patients(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user = super::authenticate(&resources, &headers).await?;
    let patients = resources.database.list_patients(user.id).await?;
    Ok(Json(patients))
}

/// Save a patient: upsert demographics, append an assessment snapshot
///
/// `POST /api/patients`
///
/// # Errors
///
/// Returns 404 when the patient id belongs to another doctor.
async fn save_patient(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Json(mut record): Json<PatientRecord>,
) -> AppResult<impl IntoResponse> {
    let user = super::authenticate(&resources, &headers).await?;

    // The calculator is the source of truth for derived metrics
    record.recompute_metrics();
    record.user_id = Some(user.id);

    let saved_id = resources
        .database
        .save_patient(user.id, &record)
        .await?
        .ok_or_else(|| AppError::not_found("Patient").with_resource_id(record.id.to_string()))?;

    info!(user_id = %user.id, patient_id = %saved_id, "Assessment saved");
    Ok(Json(record))
}

/// Delete a patient and its assessment history
///
/// `DELETE /api/patients/:id`
///
/// # Errors
///
/// Returns 404 when the patient does not exist or is not owned by the
/// caller.
async fn delete_patient(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Path(patient_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user = super::authenticate(&resources, &headers).await?;

    let deleted = resources.database.delete_patient(user.id, patient_id).await?;
    if !deleted {
        return Err(AppError::not_found("Patient").with_resource_id(patient_id.to_string()));
    }

    info!(user_id = %user.id, patient_id = %patient_id, "Patient deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Risk report: stored record plus recomputed interpretations
///
/// `GET /api/patients/:id/report`
///
/// Interpretations are never read from storage; they are derived from the
/// persisted raw values on every request.
///
/// # Errors
///
/// Returns 404 when the patient does not exist or is not owned by the
/// caller.
async fn patient_report(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
    Path(patient_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user = super::authenticate(&resources, &headers).await?;

    let mut record = resources
        .database
        .get_patient(user.id, patient_id)
        .await?
        .ok_or_else(|| AppError::not_found("Patient").with_resource_id(patient_id.to_string()))?;

    record.recompute_metrics();
    let interpretations = RiskReport::for_record(&record);

    Ok(Json(ReportResponse {
        patient: record,
        interpretations,
    }))
}

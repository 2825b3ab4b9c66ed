// ABOUTME: Core data models for accounts, patients, and assessment snapshots
// ABOUTME: Serde-serializable structs shared by the database layer and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Data Models
//!
//! Domain structs shared across the application. Wire representation is
//! camelCase JSON, matching what the report frontend consumes. Validation of
//! raw payloads happens at the HTTP boundary; these types assume their
//! invariants hold.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::risk::calculator::{compute_bmi, compute_homa_ir, compute_tg_hdl};

/// Account role hierarchy: admins manage doctor accounts, doctors own
/// patient records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(anyhow::anyhow!("Unknown user role: {other}")),
        }
    }
}

/// A doctor or admin account.
///
/// `expires_at` implements subscription expiry: a `None` value means the
/// account never expires. Deactivated or expired accounts cannot log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl User {
    /// Create a new doctor account, active by default with the customary
    /// "Dr." title.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            role: UserRole::User,
            is_active: true,
            expires_at: None,
            created_at: Utc::now(),
            first_name,
            last_name,
            title: Some("Dr.".into()),
            specialization: None,
            email: None,
            phone: None,
        }
    }

    /// Whether the account's subscription has lapsed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry < now)
    }
}

/// Patient biological sex as recorded on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::M),
            "F" => Ok(Self::F),
            other => Err(anyhow::anyhow!("Unknown gender marker: {other}")),
        }
    }
}

/// Raw measurement set supplied per evaluation.
///
/// Weight in kg, height in cm, glucose/HDL/triglycerides in mg/dL, insulin
/// in uIU/mL. Missing lab values arrive as zero and flow through as the
/// sentinel (see [`crate::risk::calculator`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementInput {
    pub weight: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_weight: Option<f64>,
    pub glucose: f64,
    pub insulin: f64,
    pub hdl: f64,
    pub triglycerides: f64,
}

/// The three derived metrics, immutable once computed for a given input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub bmi: f64,
    pub homa_ir: f64,
    pub tg_hdl_ratio: f64,
}

impl DerivedMetrics {
    /// Compute all three metrics from a raw measurement set.
    ///
    /// The calculator is the source of truth for these numbers; persisted
    /// copies exist only for display.
    #[must_use]
    pub fn from_input(input: &MeasurementInput) -> Self {
        Self {
            bmi: compute_bmi(input.weight, input.height),
            homa_ir: compute_homa_ir(input.glucose, input.insulin),
            tg_hdl_ratio: compute_tg_hdl(input.triglycerides, input.hdl),
        }
    }
}

/// Flattened patient aggregate: demographics plus the latest assessment
/// snapshot. This is the shape the API serves and accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    pub weight: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_weight: Option<f64>,
    #[serde(default)]
    pub bmi: f64,

    pub glucose: f64,
    pub insulin: f64,
    pub hdl: f64,
    pub triglycerides: f64,

    #[serde(default)]
    pub homa_ir: f64,
    #[serde(default)]
    pub tg_hdl_ratio: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

impl PatientRecord {
    /// Extract the raw measurement set from this record.
    #[must_use]
    pub fn measurements(&self) -> MeasurementInput {
        MeasurementInput {
            weight: self.weight,
            height: self.height,
            ideal_weight: self.ideal_weight,
            glucose: self.glucose,
            insulin: self.insulin,
            hdl: self.hdl,
            triglycerides: self.triglycerides,
        }
    }

    /// Recompute and overwrite the derived metrics from the raw values.
    ///
    /// Client-supplied metric fields are never trusted; every save path
    /// calls this before persisting.
    pub fn recompute_metrics(&mut self) {
        let metrics = DerivedMetrics::from_input(&self.measurements());
        self.bmi = metrics.bmi;
        self.homa_ir = metrics.homa_ir;
        self.tg_hdl_ratio = metrics.tg_hdl_ratio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults() {
        let user = User::new("mrossi", "hash", Some("Mario".into()), Some("Rossi".into()));
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
        assert_eq!(user.title.as_deref(), Some("Dr."));
        assert!(user.expires_at.is_none());
        assert!(!user.is_expired(Utc::now()));
    }

    #[test]
    fn expired_user_detection() {
        let mut user = User::new("mrossi", "hash", None, None);
        user.expires_at = Some(Utc::now() - chrono::Duration::days(1));
        assert!(user.is_expired(Utc::now()));
        user.expires_at = Some(Utc::now() + chrono::Duration::days(1));
        assert!(!user.is_expired(Utc::now()));
    }

    #[test]
    fn password_hash_never_serialized() {
        let user = User::new("mrossi", "secret-hash", None, None);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"username\":\"mrossi\""));
    }

    #[test]
    fn recompute_overwrites_client_metrics() {
        let mut record = sample_record();
        record.bmi = 99.0;
        record.homa_ir = 99.0;
        record.tg_hdl_ratio = 99.0;
        record.recompute_metrics();
        assert!((record.bmi - 22.9).abs() < f64::EPSILON);
        assert!((record.homa_ir - 2.22).abs() < f64::EPSILON);
        assert!((record.tg_hdl_ratio - 3.0).abs() < f64::EPSILON);
    }

    fn sample_record() -> PatientRecord {
        PatientRecord {
            id: Uuid::new_v4(),
            user_id: None,
            first_name: "Anna".into(),
            last_name: "Bianchi".into(),
            birth_date: NaiveDate::from_ymd_opt(1980, 4, 12).unwrap(),
            gender: Gender::F,
            created_at: Utc::now(),
            weight: 70.0,
            height: 175.0,
            ideal_weight: None,
            bmi: 0.0,
            glucose: 90.0,
            insulin: 10.0,
            hdl: 50.0,
            triglycerides: 150.0,
            homa_ir: 0.0,
            tg_hdl_ratio: 0.0,
            ai_analysis: None,
        }
    }
}

// ABOUTME: Risk scoring core: metric calculation, interpretation, and narrative prompting
// ABOUTME: Pure, stateless functions shared by report routes and the narrative endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Risk Scoring Core
//!
//! The deterministic heart of the application: raw measurements go in,
//! derived metrics and classified interpretations come out. Everything in
//! this module tree is side-effect free and safe to call concurrently.

/// Derived-metric formulas (BMI, HOMA-IR, TG/HDL)
pub mod calculator;
/// Threshold classification into clinical status tiers
pub mod interpreter;
/// Deterministic prompt construction for the AI narrative
pub mod narrative;

use serde::{Deserialize, Serialize};

use crate::models::PatientRecord;
use interpreter::{interpret_bmi, interpret_homa_ir, interpret_tg_hdl, MetricInterpretation};

/// Full interpretation bundle for one patient record, as served by the
/// report endpoint. Always recomputed from stored raw values, never read
/// back from persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub bmi: MetricInterpretation,
    pub homa_ir: MetricInterpretation,
    pub tg_hdl_ratio: MetricInterpretation,
}

impl RiskReport {
    /// Interpret a record's derived metrics.
    ///
    /// Callers are expected to have run
    /// [`PatientRecord::recompute_metrics`] (or loaded a record whose
    /// metrics were computed server-side) beforehand.
    #[must_use]
    pub fn for_record(record: &PatientRecord) -> Self {
        Self {
            bmi: interpret_bmi(record.bmi),
            homa_ir: interpret_homa_ir(record.homa_ir),
            tg_hdl_ratio: interpret_tg_hdl(record.tg_hdl_ratio),
        }
    }
}

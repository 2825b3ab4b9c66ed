// ABOUTME: Pure derived-metric computation for BMI, HOMA-IR, and TG/HDL ratio
// ABOUTME: Stateless formulas over raw measurements with sentinel-zero handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Risk Metric Calculator
//!
//! Converts raw anthropometric and lab measurements into the three derived
//! metrics the report is built on. All functions are pure and total: they
//! never panic, never validate their inputs (that is the HTTP boundary's
//! job), and always produce the same output for the same input.
//!
//! A zero or missing divisor resolves to a `0.0` sentinel rather than an
//! error. This is the "no lab data" marker inherited from the product
//! contract; it is deliberately indistinguishable from a computed zero.

/// HOMA-IR denominator constant (glucose in mg/dL, insulin in uIU/mL).
const HOMA_DENOMINATOR: f64 = 405.0;

/// Round to `decimals` places, half away from zero.
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(decimals).unwrap_or(0));
    (value * factor).round() / factor
}

/// Body Mass Index from weight (kg) and height (cm), rounded to 1 decimal.
///
/// Returns `0.0` when `height_cm <= 0` since the ratio is undefined.
/// Negative or absurd weights are passed through unvalidated.
#[must_use]
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    round_to(weight_kg / (height_m * height_m), 1)
}

/// HOMA-IR insulin resistance score, rounded to 2 decimals.
///
/// Formula: (glucose mg/dL x insulin uIU/mL) / 405. Returns the `0.0`
/// sentinel when either lab value is zero (no lab data).
#[must_use]
pub fn compute_homa_ir(glucose: f64, insulin: f64) -> f64 {
    if glucose == 0.0 || insulin == 0.0 {
        return 0.0;
    }
    round_to((glucose * insulin) / HOMA_DENOMINATOR, 2)
}

/// Triglyceride-to-HDL ratio, rounded to 2 decimals.
///
/// Returns the `0.0` sentinel when `hdl` is zero.
#[must_use]
pub fn compute_tg_hdl(triglycerides: f64, hdl: f64) -> f64 {
    if hdl == 0.0 {
        return 0.0;
    }
    round_to(triglycerides / hdl, 2)
}

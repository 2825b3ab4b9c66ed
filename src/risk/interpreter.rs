// ABOUTME: Threshold classification of derived metrics into clinical status tiers
// ABOUTME: Fixed breakpoints with Italian status labels and report descriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Risk Interpreter
//!
//! Maps each derived metric to a qualitative status, an ordinal severity
//! tier, and the fixed clinical sentence shown on the report. Breakpoints
//! follow The Blood Code / functional-medicine reference ranges and are the
//! scoring contract clinicians rely on: boundary inclusivity must not drift.
//!
//! Interpretations are never persisted. They are recomputed from stored raw
//! values every time a report is rendered, so these functions carry no
//! hidden state.

use serde::{Deserialize, Serialize};

/// Qualitative clinical status, ordered from best to worst.
///
/// Labels are Italian because that is the language of the rendered report.
/// `Buono` only appears in the HOMA-IR scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricStatus {
    /// Optimal range
    #[serde(rename = "Ottimo")]
    Ottimo,
    /// Within norm but worth monitoring (HOMA-IR only)
    #[serde(rename = "Buono")]
    Buono,
    /// Early warning range
    #[serde(rename = "Attenzione")]
    Attenzione,
    /// Elevated cardiometabolic risk
    #[serde(rename = "Rischio Elevato")]
    RischioElevato,
}

impl MetricStatus {
    /// Ordinal severity rank (0 = best, 3 = worst) underlying the labels.
    #[must_use]
    pub const fn tier(self) -> u8 {
        match self {
            Self::Ottimo => 0,
            Self::Buono => 1,
            Self::Attenzione => 2,
            Self::RischioElevato => 3,
        }
    }

    /// Human-readable label as it appears on the report.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ottimo => "Ottimo",
            Self::Buono => "Buono",
            Self::Attenzione => "Attenzione",
            Self::RischioElevato => "Rischio Elevato",
        }
    }
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One interpreted metric: the value echoed back, its status, and the fixed
/// clinical sentence tied to that status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricInterpretation {
    pub value: f64,
    pub status: MetricStatus,
    pub tier: u8,
    pub description: String,
}

impl MetricInterpretation {
    fn new(value: f64, status: MetricStatus, description: &str) -> Self {
        Self {
            value,
            status,
            tier: status.tier(),
            description: description.to_owned(),
        }
    }
}

/// Classify a HOMA-IR score.
///
/// `< 1.0` Ottimo, `1.0..=1.9` Buono, `(1.9, 2.9]` Attenzione, `> 2.9`
/// Rischio Elevato. A score of exactly 1.9 is "Buono", not "Attenzione".
#[must_use]
pub fn interpret_homa_ir(value: f64) -> MetricInterpretation {
    if value < 1.0 {
        MetricInterpretation::new(value, MetricStatus::Ottimo, "Sensibilità insulinica ottimale.")
    } else if value <= 1.9 {
        MetricInterpretation::new(
            value,
            MetricStatus::Buono,
            "Sensibilità insulinica nella norma, ma monitorare.",
        )
    } else if value <= 2.9 {
        MetricInterpretation::new(
            value,
            MetricStatus::Attenzione,
            "Insulino-resistenza precoce. Necessario intervento sullo stile di vita.",
        )
    } else {
        MetricInterpretation::new(
            value,
            MetricStatus::RischioElevato,
            "Insulino-resistenza significativa. Rischio cardiometabolico elevato.",
        )
    }
}

/// Classify a triglyceride/HDL ratio.
///
/// `< 2.0` Ottimo, `[2.0, 3.8)` Attenzione, `>= 3.8` Rischio Elevato.
#[must_use]
pub fn interpret_tg_hdl(value: f64) -> MetricInterpretation {
    if value < 2.0 {
        MetricInterpretation::new(
            value,
            MetricStatus::Ottimo,
            "Pattern lipidico ideale (LDL particelle grandi).",
        )
    } else if value < 3.8 {
        MetricInterpretation::new(
            value,
            MetricStatus::Attenzione,
            "Rischio moderato. Monitorare assunzione di carboidrati.",
        )
    } else {
        MetricInterpretation::new(
            value,
            MetricStatus::RischioElevato,
            "Pattern lipidico aterogenico (LDL particelle piccole e dense).",
        )
    }
}

/// Classify a BMI value.
///
/// `< 18.5` Attenzione (Sottopeso), `[18.5, 25)` Ottimo (Normopeso),
/// `[25, 30)` Attenzione (Sovrappeso), `>= 30` Rischio Elevato (Obesità).
/// BMI has no "Buono" tier.
#[must_use]
pub fn interpret_bmi(value: f64) -> MetricInterpretation {
    if value < 18.5 {
        MetricInterpretation::new(value, MetricStatus::Attenzione, "Sottopeso")
    } else if value < 25.0 {
        MetricInterpretation::new(value, MetricStatus::Ottimo, "Normopeso")
    } else if value < 30.0 {
        MetricInterpretation::new(value, MetricStatus::Attenzione, "Sovrappeso")
    } else {
        MetricInterpretation::new(value, MetricStatus::RischioElevato, "Obesità")
    }
}

// ABOUTME: Text-generation provider abstraction for the AI narrative summary
// ABOUTME: Defines the NarrativeProvider trait and re-exports the Gemini implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Narrative Provider Abstraction
//!
//! The risk core only produces a prompt string; everything network-facing
//! lives behind [`NarrativeProvider`]. A provider failure degrades to "no
//! narrative available" at the route layer and never blocks a patient
//! record save. Retry and timeout policy, if any, belongs here and not in
//! the pure core.

/// Google Gemini text-generation client
pub mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;

use crate::errors::AppResult;

/// A text-generation backend that turns a report prompt into a short
/// clinical narrative.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Generate a narrative from the given prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails or returns no text.
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Human-readable provider name for logging
    fn display_name(&self) -> &'static str;
}

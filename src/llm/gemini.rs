// ABOUTME: Google Gemini narrative provider implementation
// ABOUTME: Calls the generateContent endpoint of the Generative Language API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Gemini Provider
//!
//! Implementation of [`NarrativeProvider`](super::NarrativeProvider) for
//! Google's Gemini models via the Generative Language API.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with an API key from
//! Google AI Studio. `GEMINI_MODEL` overrides the default model.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::{AppError, AppResult};

/// Environment variable for the Gemini API key
const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request timeout; narrative generation is interactive, not batch
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for the Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

/// Text part of a content block
#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini narrative provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    model: String,
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
        }
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not set.
    pub fn from_env() -> AppResult<Self> {
        let api_key = env::var(GEMINI_API_KEY_ENV)
            .map_err(|_| AppError::config(format!("{GEMINI_API_KEY_ENV} is not set")))?;
        Ok(Self::new(api_key))
    }

    fn endpoint(&self) -> String {
        format!(
            "{API_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

#[async_trait]
impl super::NarrativeProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".into()),
                parts: vec![ContentPart {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.4),
                // ~200 words of Italian prose fits comfortably
                max_output_tokens: Some(1024),
            }),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Requesting narrative generation");

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {e}");
                AppError::external_service("gemini", e.to_string())
            })?;

        let status = response.status();
        let body: GeminiResponse = response.json().await.map_err(|e| {
            AppError::external_service("gemini", format!("invalid response body: {e}"))
        })?;

        if let Some(api_error) = body.error {
            return Err(AppError::external_service(
                "gemini",
                format!("{status}: {}", api_error.message),
            ));
        }

        let text = body
            .candidates
            .and_then(|mut candidates| candidates.drain(..).next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty());

        text.ok_or_else(|| AppError::external_service("gemini", "response contained no text"))
    }

    fn display_name(&self) -> &'static str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_model_and_key() {
        let provider = GeminiProvider::new("test-key");
        let endpoint = provider.endpoint();
        assert!(endpoint.contains(":generateContent"));
        assert!(endpoint.ends_with("key=test-key"));
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let provider = GeminiProvider::new("super-secret");
        let debugged = format!("{provider:?}");
        assert!(!debugged.contains("super-secret"));
    }

    #[test]
    fn response_parsing_extracts_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Valutazione clinica."}]}}
            ]
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        let text = parsed.candidates.unwrap()[0]
            .content
            .as_ref()
            .unwrap()
            .parts[0]
            .text
            .clone();
        assert_eq!(text, "Valutazione clinica.");
    }
}

// ABOUTME: Shared server resources passed to every route handler as axum state
// ABOUTME: Owns the database handle, auth manager, config, and optional narrative provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Server Resources
//!
//! All long-lived dependencies are constructed once at startup and shared
//! behind a single `Arc`. Nothing in here is lazily initialized: the
//! database handle and auth manager are built explicitly in the binary (or
//! in test helpers) and passed in, which keeps initialization order visible
//! and makes fakes trivial to inject.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::NarrativeProvider;

/// Dependency container shared across all HTTP handlers
pub struct ServerResources {
    /// Database connection handle
    pub database: Database,
    /// Session token manager
    pub auth: AuthManager,
    /// Server configuration
    pub config: ServerConfig,
    /// Narrative provider; `None` when no API key is configured, in which
    /// case the narrative endpoint degrades gracefully
    pub narrative: Option<Arc<dyn NarrativeProvider>>,
}

impl ServerResources {
    /// Bundle pre-built dependencies into a shared context
    #[must_use]
    pub fn new(
        database: Database,
        auth: AuthManager,
        config: ServerConfig,
        narrative: Option<Arc<dyn NarrativeProvider>>,
    ) -> Self {
        Self {
            database,
            auth,
            config,
            narrative,
        }
    }
}

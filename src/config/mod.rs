// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Re-exports the environment configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! Configuration management (environment-only, no config files)

/// Environment variable parsing and typed configuration
pub mod environment;

pub use environment::{AuthConfig, DatabaseUrl, Environment, ServerConfig};

// ABOUTME: Main library entry point for the Metabolica clinical assessment server
// ABOUTME: REST API for cardiometabolic risk reports with AI-generated narratives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

#![deny(unsafe_code)]

//! # Metabolica
//!
//! A clinical assessment server for cardiometabolic risk evaluation.
//! Doctors record patient anthropometric and laboratory measurements;
//! the server derives BMI, HOMA-IR, and the triglyceride/HDL ratio,
//! classifies each against clinical breakpoints, and optionally produces
//! an Italian narrative report through an LLM provider.
//!
//! ## Architecture
//!
//! - **Risk core**: pure calculator, interpreter, and prompt builder with
//!   no I/O (`risk`)
//! - **Persistence**: explicit SQLite handle, owner-scoped patient data
//!   with append-only assessment history (`database`)
//! - **HTTP surface**: axum routers per domain sharing one resource
//!   container (`routes`, `context`)
//! - **Accounts**: bcrypt credentials, JWT sessions, admin-managed
//!   activation and subscription expiry (`auth`, `models`)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use metabolica::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Metabolica configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Session tokens and password hashing
pub mod auth;
/// Environment-driven server configuration
pub mod config;
/// Shared resource container passed to handlers
pub mod context;
/// SQLite persistence for accounts, patients, and assessments
pub mod database;
/// Unified error types and HTTP error responses
pub mod errors;
/// Narrative provider trait and the Gemini implementation
pub mod llm;
/// Structured logging initialization
pub mod logging;
/// Domain data models
pub mod models;
/// Pure risk computation: calculator, interpreter, prompt builder
pub mod risk;
/// HTTP route handlers organized by domain
pub mod routes;

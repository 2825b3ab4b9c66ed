// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and account creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `metabolica`

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use metabolica::auth::{hash_password, AuthManager};
use metabolica::config::{AuthConfig, DatabaseUrl, Environment, ServerConfig};
use metabolica::context::ServerResources;
use metabolica::database::Database;
use metabolica::models::{Gender, PatientRecord, User, UserRole};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with the schema migrated
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    database.migrate().await?;
    Ok(database)
}

/// Auth manager with a fixed test secret and one-hour tokens
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(b"test-secret-for-integration-tests", 1)
}

/// Server configuration suitable for tests (no narrative provider)
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        database_url: DatabaseUrl::Memory,
        auth: AuthConfig {
            jwt_secret: "test-secret-for-integration-tests".into(),
            jwt_expiry_hours: 1,
            bootstrap_admin_password: "admin123".into(),
        },
        gemini_api_key: None,
    }
}

/// Full resource container backed by an in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let auth = create_test_auth_manager();
    let config = create_test_config();
    Ok(Arc::new(ServerResources::new(database, auth, config, None)))
}

/// Insert a doctor account with the given username and password
pub async fn create_test_user(database: &Database, username: &str, password: &str) -> Result<User> {
    let user = User::new(
        username,
        hash_password(password)?,
        Some("Mario".into()),
        Some("Rossi".into()),
    );
    database.create_user(&user).await?;
    Ok(user)
}

/// Insert an admin account
pub async fn create_test_admin(database: &Database, username: &str, password: &str) -> Result<User> {
    let mut admin = User::new(
        username,
        hash_password(password)?,
        Some("System".into()),
        Some("Admin".into()),
    );
    admin.role = UserRole::Admin;
    database.create_user(&admin).await?;
    Ok(admin)
}

/// A realistic patient record with raw measurements only
pub fn sample_patient() -> PatientRecord {
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

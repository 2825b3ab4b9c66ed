// ABOUTME: SQLite database handle with explicit lifecycle and schema migration
// ABOUTME: Domain operations live in users.rs and patients.rs impl blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Database Layer
//!
//! A single explicitly constructed [`Database`] handle wraps the sqlx pool:
//! opened once at process start, passed through [`crate::context`], closed at
//! shutdown. There is no lazily initialized global pool; tests construct
//! their own in-memory instance.

/// Patient and assessment persistence, owner-scoped
mod patients;
/// Account persistence and admin lifecycle operations
mod users;

pub use users::ProfileUpdate;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

/// Username of the seeded bootstrap admin account
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Database connection handle
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool against the given sqlx connection string
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await
            .with_context(|| format!("Failed to open database: {connection_string}"))?;

        Ok(Self { pool })
    }

    /// Run schema migrations for every domain
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_patients().await?;
        info!("Database schema migrated");
        Ok(())
    }

    /// Seed the bootstrap admin account if no admin exists yet
    ///
    /// The password is bcrypt-hashed at seed time; nothing plaintext is
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or the insert fails.
    pub async fn seed_bootstrap_admin(&self, password: &str) -> Result<bool> {
        if self.admin_exists().await? {
            return Ok(false);
        }

        let hash = crate::auth::hash_password(password)?;
        let mut admin = crate::models::User::new(
            BOOTSTRAP_ADMIN_USERNAME,
            hash,
            Some("System".into()),
            Some("Admin".into()),
        );
        admin.role = crate::models::UserRole::Admin;
        self.create_user(&admin).await?;
        info!("Seeded bootstrap admin account '{BOOTSTRAP_ADMIN_USERNAME}'");
        Ok(true)
    }

    /// Trivial connectivity check for readiness probes
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

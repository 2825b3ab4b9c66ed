// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! Environment-based configuration management for production deployment
//!
//! Configuration is environment-only: no config files. Every knob has a
//! development-friendly default except the JWT secret in production.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment type for security and logging defaults
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}?mode=rwc", path.display()),
            Self::Memory => "sqlite::memory:".to_string(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign HS256 session tokens
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Password used when seeding the bootstrap admin account
    pub bootstrap_admin_password: String,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Gemini API key for the narrative provider, if configured
    pub gemini_api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` or `JWT_EXPIRY_HOURS` are present but
    /// unparseable, or if `JWT_SECRET` is missing in production.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        );

        let http_port = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .context("HTTP_PORT must be a valid port number")?;

        let database_url = DatabaseUrl::parse_url(
            &env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/metabolica.db".into()),
        );

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if environment.is_production() => {
                anyhow::bail!("JWT_SECRET must be set in production")
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, generating an ephemeral development secret");
                generate_dev_secret()
            }
        };

        let jwt_expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse::<i64>()
            .context("JWT_EXPIRY_HOURS must be a valid integer")?;

        let bootstrap_admin_password =
            env::var("BOOTSTRAP_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());

        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            http_port,
            environment,
            database_url,
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours,
                bootstrap_admin_password,
            },
            gemini_api_key,
        })
    }

    /// One-line configuration summary for startup logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} port={} database={} narrative_provider={}",
            self.environment,
            self.http_port,
            self.database_url.to_connection_string(),
            if self.gemini_api_key.is_some() {
                "gemini"
            } else {
                "disabled"
            }
        )
    }
}

/// Generate a random secret for development runs
fn generate_dev_secret() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("testing"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything"),
            Environment::Development
        );
    }

    #[test]
    fn database_url_parsing() {
        assert!(matches!(
            DatabaseUrl::parse_url("sqlite::memory:"),
            DatabaseUrl::Memory
        ));
        let url = DatabaseUrl::parse_url("sqlite:data/app.db");
        assert_eq!(url.to_connection_string(), "sqlite:data/app.db?mode=rwc");
        // Bare paths are treated as sqlite files
        assert!(matches!(
            DatabaseUrl::parse_url("data/app.db"),
            DatabaseUrl::SQLite { .. }
        ));
    }

    #[test]
    fn dev_secret_is_nonempty_hex() {
        let secret = generate_dev_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

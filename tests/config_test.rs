// ABOUTME: Integration tests for environment-driven configuration and database lifecycle
// ABOUTME: Environment variable parsing plus on-disk sqlite open/migrate/reopen

mod common;

use anyhow::Result;
use metabolica::config::{DatabaseUrl, Environment, ServerConfig};
use metabolica::database::Database;
use serial_test::serial;
use std::env;

fn clear_config_env() {
    for key in [
        "ENVIRONMENT",
        "HTTP_PORT",
        "DATABASE_URL",
        "JWT_SECRET",
        "JWT_EXPIRY_HOURS",
        "BOOTSTRAP_ADMIN_PASSWORD",
        "GEMINI_API_KEY",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_apply_in_development() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.auth.jwt_expiry_hours, 24);
    // Ephemeral dev secret is generated when none is configured
    assert!(!config.auth.jwt_secret.is_empty());
    assert!(config.gemini_api_key.is_none());
}

#[test]
#[serial]
fn production_requires_jwt_secret() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "production");

    assert!(ServerConfig::from_env().is_err());

    env::set_var("JWT_SECRET", "configured-secret");
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.auth.jwt_secret, "configured-secret");
    clear_config_env();
}

#[test]
#[serial]
fn environment_overrides_are_honored() {
    clear_config_env();
    env::set_var("HTTP_PORT", "8080");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("JWT_EXPIRY_HOURS", "48");
    env::set_var("GEMINI_API_KEY", "test-key");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);
    assert!(matches!(config.database_url, DatabaseUrl::Memory));
    assert_eq!(config.auth.jwt_expiry_hours, 48);
    assert_eq!(config.gemini_api_key.as_deref(), Some("test-key"));
    // Secrets stay out of the startup summary
    assert!(!config.summary().contains("test-key"));
    clear_config_env();
}

#[tokio::test]
async fn on_disk_database_survives_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("metabolica.db"),
    };
    let connection_string = url.to_connection_string();

    let database = Database::new(&connection_string).await?;
    database.migrate().await?;
    let user = common::create_test_user(&database, "mrossi", "segreto123").await?;
    database.close().await;

    let reopened = Database::new(&connection_string).await?;
    reopened.migrate().await?;
    let loaded = reopened.get_user(user.id).await?.unwrap();
    assert_eq!(loaded.username, "mrossi");
    reopened.close().await;
    Ok(())
}

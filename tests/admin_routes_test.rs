// ABOUTME: Integration tests for the admin console routes
// ABOUTME: Account creation, activation toggling, expiry dates, and password resets

mod common;
mod helpers;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::axum_test::AxumTestRequest;
use metabolica::routes;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn admin_lists_all_accounts() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let admin = common::create_test_admin(&resources.database, "admin", "admin123").await?;
    common::create_test_user(&resources.database, "mrossi", "segreto123").await?;
    let token = resources.auth.generate_token(&admin)?;
    let app = routes::router(resources);

    let response = AxumTestRequest::get("/api/admin/users")
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn non_admin_is_forbidden() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let user = common::create_test_user(&resources.database, "mrossi", "segreto123").await?;
    let token = resources.auth.generate_token(&user)?;
    let app = routes::router(resources);

    let response = AxumTestRequest::get("/api/admin/users")
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_creates_account_with_expiry() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let admin = common::create_test_admin(&resources.database, "admin", "admin123").await?;
    let token = resources.auth.generate_token(&admin)?;
    let expires_at = Utc::now() + Duration::days(365);
    let app = routes::router(resources.clone());

    let response = AxumTestRequest::post("/api/admin/users")
        .bearer(&token)
        .json(&json!({
            "username": "gverdi",
            "password": "segreto123",
            "firstName": "Giuseppe",
            "lastName": "Verdi",
            "expiresAt": expires_at.to_rfc3339()
        }))
        .send(app)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json();
    assert_eq!(body["user"]["username"], "gverdi");
    assert_eq!(body["user"]["role"], "user");

    let stored = resources
        .database
        .get_user_by_username("gverdi")
        .await?
        .unwrap();
    assert!(stored.expires_at.is_some());
    Ok(())
}

#[tokio::test]
async fn deactivation_locks_out_existing_tokens() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let admin = common::create_test_admin(&resources.database, "admin", "admin123").await?;
    let user = common::create_test_user(&resources.database, "mrossi", "segreto123").await?;
    let admin_token = resources.auth.generate_token(&admin)?;
    let user_token = resources.auth.generate_token(&user)?;
    let app = routes::router(resources);

    // Works before deactivation
    let response = AxumTestRequest::get("/api/patients")
        .bearer(&user_token)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = AxumTestRequest::put(&format!("/api/admin/users/{}/status", user.id))
        .bearer(&admin_token)
        .json(&json!({ "isActive": false }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json()["user"]["isActive"], false);

    // The still-valid token is now refused
    let response = AxumTestRequest::get("/api/patients")
        .bearer(&user_token)
        .send(app)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.json()["error"]["message"], "Account disattivato");
    Ok(())
}

#[tokio::test]
async fn password_reset_changes_login_credentials() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let admin = common::create_test_admin(&resources.database, "admin", "admin123").await?;
    let user = common::create_test_user(&resources.database, "mrossi", "vecchia123").await?;
    let admin_token = resources.auth.generate_token(&admin)?;
    let app = routes::router(resources);

    let response = AxumTestRequest::put(&format!("/api/admin/users/{}/password", user.id))
        .bearer(&admin_token)
        .json(&json!({ "password": "nuova1234" }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let old = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "username": "mrossi", "password": "vecchia123" }))
        .send(app.clone())
        .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "username": "mrossi", "password": "nuova1234" }))
        .send(app)
        .await;
    assert_eq!(new.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn updates_on_unknown_accounts_are_not_found() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let admin = common::create_test_admin(&resources.database, "admin", "admin123").await?;
    let token = resources.auth.generate_token(&admin)?;
    let app = routes::router(resources);

    let missing = Uuid::new_v4();
    let response = AxumTestRequest::put(&format!("/api/admin/users/{missing}/status"))
        .bearer(&token)
        .json(&json!({ "isActive": true }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = AxumTestRequest::put(&format!("/api/admin/users/{missing}/password"))
        .bearer(&token)
        .json(&json!({ "password": "nuova1234" }))
        .send(app)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn bootstrap_admin_seeding_is_idempotent() -> Result<()> {
    let resources = common::create_test_resources().await?;

    assert!(resources.database.seed_bootstrap_admin("admin123").await?);
    // Second call is a no-op once an admin exists
    assert!(!resources.database.seed_bootstrap_admin("admin123").await?);

    let admin = resources
        .database
        .get_user_by_username("admin")
        .await?
        .unwrap();
    assert!(admin.role.is_admin());
    // Stored as a bcrypt hash, never plaintext
    assert!(admin.password_hash.starts_with("$2"));
    Ok(())
}

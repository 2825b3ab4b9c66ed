// ABOUTME: Account management database operations
// ABOUTME: Handles registration, login lookup, profile updates, and admin lifecycle

use super::Database;
use crate::models::{User, UserRole};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

/// Partial profile update; `None` fields keep their current value
/// (COALESCE semantics).
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Database {
    /// Create the users table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
                is_active BOOLEAN NOT NULL DEFAULT 1,
                expires_at DATETIME,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                first_name TEXT,
                last_name TEXT,
                title TEXT,
                specialization TEXT,
                email TEXT,
                phone TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new account
    ///
    /// # Errors
    ///
    /// Returns an error if the username is already in use or the insert
    /// fails.
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(anyhow!("Nome utente già in uso"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, username, password_hash, role, is_active, expires_at, created_at,
                first_name, last_name, title, specialization, email, phone
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.expires_at)
        .bind(user.created_at)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.title)
        .bind(&user.specialization)
        .bind(&user.email)
        .bind(&user.phone)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get an account by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Get an account by username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_impl("username", username).await
    }

    /// Internal implementation for getting an account
    async fn get_user_impl(&self, field: &str, value: &str) -> Result<Option<User>> {
        let query = format!(
            r"
            SELECT id, username, password_hash, role, is_active, expires_at, created_at,
                   first_name, last_name, title, specialization, email, phone
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    /// All accounts, newest first (admin console listing)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT id, username, password_hash, role, is_active, expires_at, created_at,
                   first_name, last_name, title, specialization, email, phone
            FROM users ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Whether any admin account exists (bootstrap check)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn admin_exists(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Partially update an account's profile fields
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub async fn update_user_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<User> {
        sqlx::query(
            r"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                title = COALESCE($4, title),
                specialization = COALESCE($5, specialization),
                email = COALESCE($6, email),
                phone = COALESCE($7, phone)
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.title)
        .bind(&update.specialization)
        .bind(&update.email)
        .bind(&update.phone)
        .execute(&self.pool)
        .await?;

        self.get_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("User not found: {user_id}"))
    }

    /// Set an account's active flag and subscription expiry (admin console)
    ///
    /// Returns the updated account, or `None` when no such account exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_user_status(
        &self,
        user_id: Uuid,
        is_active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<User>> {
        let result = sqlx::query("UPDATE users SET is_active = $2, expires_at = $3 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(is_active)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(user_id).await
    }

    /// Replace an account's password hash (admin reset)
    ///
    /// Returns `false` when no such account exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_user_password(&self, user_id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Convert a database row to a User struct
    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.get("id");
        let role: String = row.get("role");

        Ok(User {
            id: Uuid::parse_str(&id)?,
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            role: role.parse::<UserRole>()?,
            is_active: row.get("is_active"),
            expires_at: row.get("expires_at"),
            created_at: row.get("created_at"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            title: row.get("title"),
            specialization: row.get("specialization"),
            email: row.get("email"),
            phone: row.get("phone"),
        })
    }
}

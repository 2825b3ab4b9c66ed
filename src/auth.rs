// ABOUTME: JWT-based user authentication and session token management
// ABOUTME: Handles token generation, validation, and bcrypt password hashing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Authentication and Session Management
//!
//! HS256 session tokens signed with a server-wide secret, plus bcrypt
//! password hashing. Tokens carry the account id, username, and role; the
//! account's active/expiry state is re-checked against the database on every
//! authenticated request, so deactivating an account takes effect
//! immediately even for outstanding tokens.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{User, UserRole};

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => {
                write!(
                    f,
                    "JWT token expired at {}",
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// Account username
    pub username: String,
    /// Account role (admin or user)
    pub role: UserRole,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authentication manager for session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from the configured secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Generate a session token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// When a token generated now would expire
    #[must_use]
    pub fn token_expiry(&self) -> DateTime<Utc> {
        Utc::now() + Duration::hours(self.token_expiry_hours)
    }

    /// Validate a session token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is expired, malformed,
    /// or its signature does not verify.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Extract the user id from a token's claims
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a valid UUID.
    pub fn user_id_from_claims(claims: &Claims) -> Result<Uuid> {
        Uuid::parse_str(&claims.sub).with_context(|| {
            format!("Failed to parse user ID from token subject: {}", claims.sub)
        })
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::debug!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Utc::now(),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

/// Hash a password with bcrypt at the default cost
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

/// Verify a password against a stored bcrypt hash
///
/// Non-bcrypt hashes (e.g. legacy values) verify as false rather than
/// erroring, so a corrupted row cannot take the login endpoint down.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new("mrossi", "hash", Some("Mario".into()), Some("Rossi".into()))
    }

    fn manager() -> AuthManager {
        AuthManager::new(b"test-secret-test-secret-test-secret!", 24)
    }

    #[test]
    fn generate_and_validate_token() {
        let auth = manager();
        let user = test_user();

        let token = auth.generate_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "mrossi");
        assert_eq!(claims.role, UserRole::User);
        assert!(claims.exp > Utc::now().timestamp());

        let id = AuthManager::user_id_from_claims(&claims).unwrap();
        assert_eq!(id, user.id);
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = manager().generate_token(&test_user()).unwrap();
        let other = AuthManager::new(b"another-secret-entirely-different!!!", 24);
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn malformed_token_rejected() {
        let err = manager().validate_token("not-a-jwt").unwrap_err();
        assert!(matches!(
            err,
            JwtValidationError::TokenMalformed { .. } | JwtValidationError::TokenInvalid { .. }
        ));
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("segreto123").unwrap();
        assert!(verify_password("segreto123", &hash));
        assert!(!verify_password("sbagliato", &hash));
    }

    #[test]
    fn legacy_non_bcrypt_hash_never_verifies() {
        // unsalted sha256 hex, as the legacy system stored it
        let legacy = "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";
        assert!(!verify_password("admin123", legacy));
    }
}

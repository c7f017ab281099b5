/**
 * Authentication Routes
 * Credential verification, JWT issuance/verification, and the admin gate
 */
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::{self, models::Admin};
use crate::error::ApiError;

// ============================================================================
// Configuration
// ============================================================================

lazy_static::lazy_static! {
    /// JWT secret key from environment
    pub static ref JWT_SECRET: String = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "default-jwt-secret-change-in-production".to_string());

    /// Admin email fallback (no-database development mode)
    pub static ref ADMIN_EMAIL: String = std::env::var("ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@example.com".to_string());

    /// Admin password hash fallback (no-database development mode)
    pub static ref ADMIN_PASSWORD_HASH: String = {
        if let Ok(hashed) = std::env::var("ADMIN_HASH_PASSWORD") {
            hashed
        } else if let Ok(plain) = std::env::var("ADMIN_PASSWORD") {
            hash(&plain, DEFAULT_COST).unwrap_or_else(|_| "".to_string())
        } else {
            // Default password "admin123" hashed
            hash("admin123", DEFAULT_COST).unwrap_or_else(|_| "".to_string())
        }
    };
}

/// Session token lifetime. No refresh tokens and no revocation list exist;
/// rotating JWT_SECRET invalidates every outstanding token.
const TOKEN_EXPIRY_HOURS: i64 = 24;

// ============================================================================
// Types
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub email: String, // Subject identity
    pub role: String,  // Always "admin" in this system
    pub exp: i64,      // Expiry timestamp
    pub iat: i64,      // Issued at timestamp
}

/// Admin profile returned to the client; never carries the hash
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminProfile {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub admin: AdminProfile,
}

/// Token verification failure, with expiry kept distinct so callers can
/// tell a stale session from a forged or mangled token.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

// ============================================================================
// Token Service
// ============================================================================

/// Issue a signed token embedding identity and role with a 24-hour expiry.
pub fn issue_token(email: &str, role: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::hours(TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        email: email.to_string(),
        role: role.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
}

/// Verify signature and expiry; stateless, no database lookup.
/// A token is valid strictly until its expiry instant, with no clock
/// tolerance window.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

// ============================================================================
// Authorization gate
// ============================================================================

/// Extractor gating mutating handlers: pulls the bearer token, verifies
/// it, and hands the decoded identity to the handler. Rejects before the
/// request body is read or any repository code runs.
#[derive(Debug, Clone)]
pub struct AdminClaims(pub Claims);

impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(ApiError::MissingToken)?;

        let claims = verify_token(token).map_err(|e| {
            tracing::debug!("token verification failed: {}", e);
            ApiError::InvalidToken
        })?;

        Ok(AdminClaims(claims))
    }
}

// ============================================================================
// Credential Store
// ============================================================================

/// Verify submitted credentials against the admin record.
///
/// Unknown email and wrong password fail identically (fail closed, no
/// user-enumeration signal). Returns the admin's public profile on match.
pub async fn verify_credentials(
    email: &str,
    password: &str,
) -> Result<Option<AdminProfile>, ApiError> {
    match db::get_pool() {
        Some(pool) => {
            let admin = sqlx::query_as::<_, Admin>(
                r#"SELECT id, email, password_hash, role, created_at, updated_at
                   FROM admins
                   WHERE LOWER(email) = LOWER($1)"#,
            )
            .bind(email)
            .fetch_optional(pool.as_ref())
            .await?;

            let admin = match admin {
                Some(a) => a,
                None => return Ok(None),
            };

            // bcrypt is CPU-bound; keep the async executor free.
            let password = password.to_string();
            let password_hash = admin.password_hash.clone();
            let password_ok =
                tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                    .await
                    .map(|r| r.unwrap_or(false))
                    .unwrap_or(false);

            if password_ok {
                Ok(Some(AdminProfile {
                    email: admin.email,
                    role: admin.role,
                }))
            } else {
                Ok(None)
            }
        }
        None => {
            // No DB: env-var credentials for local dev without Postgres.
            let email_matches = email.to_lowercase() == ADMIN_EMAIL.to_lowercase();
            let password = password.to_string();
            let password_ok = tokio::task::spawn_blocking(move || {
                verify(&password, &ADMIN_PASSWORD_HASH).unwrap_or(false)
            })
            .await
            .unwrap_or(false);

            if email_matches && password_ok {
                Ok(Some(AdminProfile {
                    email: email.to_lowercase(),
                    role: "admin".to_string(),
                }))
            } else {
                Ok(None)
            }
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
/// Verify credentials and return a session token with the admin profile.
pub async fn login(
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let admin = verify_credentials(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| {
            tracing::warn!("failed login attempt for: {}", payload.email);
            ApiError::InvalidCredentials
        })?;

    let token = issue_token(&admin.email, &admin.role).map_err(|e| {
        tracing::error!("failed to sign token: {}", e);
        ApiError::Unavailable
    })?;

    tracing::info!("successful login for: {}", admin.email);

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            token,
            admin,
        }),
    ))
}

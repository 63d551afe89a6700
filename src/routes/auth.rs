// ABOUTME: Authentication route handlers for registration, login, and token refresh
// ABOUTME: Validates credentials, hashes secrets, and issues session token pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! Authentication routes
//!
//! Self-service registration, credential verification, and access-token
//! rotation. Handlers are thin wrappers delegating to [`AuthService`].

use super::{envelope, AccountInfo, ApiContext};
use crate::auth::{AuthManager, TokenKind, TokenPair};
use crate::constants::{error_messages, limits};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Account;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Self-registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Email address (unique)
    pub email: String,
    /// Username used for login (unique)
    pub username: String,
    /// Cleartext password, hashed before storage
    pub password: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional display name
    pub full_name: Option<String>,
    /// Optional rank identifier
    pub rank: Option<i64>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username (exact match)
    pub username: String,
    /// Cleartext password
    pub password: String,
}

/// Token refresh request, bearing the refresh token in the body
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    /// The refresh token from a previously issued pair
    pub refresh: String,
}

/// Registration and login outcome: the account plus a fresh session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The account the session belongs to
    pub user: AccountInfo,
    /// Freshly issued token pair
    pub tokens: TokenPair,
}

/// Authentication service for registration, login, and refresh
#[derive(Clone)]
pub struct AuthService {
    database: Arc<Database>,
    auth: Arc<AuthManager>,
}

impl AuthService {
    /// Create a new authentication service
    #[must_use]
    pub const fn new(database: Arc<Database>, auth: Arc<AuthManager>) -> Self {
        Self { database, auth }
    }

    /// Handle self-service registration
    ///
    /// New accounts always start as unapproved members; the store rejects
    /// duplicate identities atomically.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for malformed fields, `DuplicateIdentity`
    /// for a taken email or username, `NotFound` for an unknown rank
    pub async fn register(&self, request: RegisterRequest) -> AppResult<SessionResponse> {
        tracing::info!("Registration attempt for username: {}", request.username);

        validate_identity_fields(&request.email, &request.username, &request.password)?;

        if let Some(rank_id) = request.rank {
            self.resolve_rank(rank_id).await?;
        }

        let password_hash = hash_password(&request.password)?;

        let mut account = Account::new(request.email, request.username, password_hash);
        account.phone = request.phone;
        account.full_name = request.full_name;
        account.rank_id = request.rank;

        self.database.create_account(&account).await?;
        let tokens = self.auth.issue_token_pair(&account)?;

        tracing::info!(
            "Account registered: {} ({})",
            account.username,
            account.id
        );

        Ok(SessionResponse {
            user: AccountInfo::from(&account),
            tokens,
        })
    }

    /// Handle credential verification
    ///
    /// Approval state is deliberately not consulted: unapproved accounts may
    /// log in, approval only gates specific listings and actions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` on unknown username or password
    /// mismatch, `InactiveAccount` for deactivated accounts
    pub async fn login(&self, request: LoginRequest) -> AppResult<SessionResponse> {
        tracing::info!("Login attempt for username: {}", request.username);

        let account = self
            .database
            .get_account_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Login failed: unknown username {}", request.username);
                AppError::invalid_credentials()
            })?;

        // Bcrypt verification is CPU-bound; keep it off the async executor
        let password = request.password;
        let password_hash = account.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            tracing::warn!("Login failed: wrong password for {}", request.username);
            return Err(AppError::invalid_credentials());
        }

        if !account.is_active {
            tracing::warn!("Login blocked for inactive account: {}", request.username);
            return Err(AppError::inactive_account());
        }

        self.database.update_last_login(account.id).await?;
        let tokens = self.auth.issue_token_pair(&account)?;

        tracing::info!("Login successful: {} ({})", account.username, account.id);

        Ok(SessionResponse {
            user: AccountInfo::from(&account),
            tokens,
        })
    }

    /// Handle access-token rotation
    ///
    /// Validates the refresh token's signature, kind, and expiry, then mints
    /// a new access token for the same account. No store round-trip.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the refresh token is invalid or expired
    pub fn refresh_access(&self, request: &RefreshTokenRequest) -> AppResult<String> {
        let claims = self
            .auth
            .validate_token(&request.refresh, TokenKind::Refresh)
            .map_err(|e| {
                tracing::warn!("Refresh token rejected: {e}");
                AppError::unauthorized(error_messages::SESSION_EXPIRED)
            })?;

        let access = self.auth.generate_access_for(&claims)?;
        tracing::info!("Access token refreshed for account: {}", claims.sub);
        Ok(access)
    }

    async fn resolve_rank(&self, rank_id: i64) -> AppResult<()> {
        self.database
            .get_rank(rank_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Rank"))
    }
}

/// Validate the identity fields shared by registration and admin creation
pub(super) fn validate_identity_fields(
    email: &str,
    username: &str,
    password: &str,
) -> AppResult<()> {
    if !is_valid_email(email) {
        return Err(AppError::validation(error_messages::INVALID_EMAIL_FORMAT));
    }
    if username.trim().is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if password.len() < limits::MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(error_messages::PASSWORD_TOO_WEAK));
    }
    Ok(())
}

/// Hash a cleartext password for storage
pub(super) fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Simple email shape validation
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() <= 5 {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false;
    }
    let domain_part = &email[at_pos + 1..];
    domain_part.contains('.')
}

/// POST /register
pub async fn handle_register(
    State(context): State<Arc<ApiContext>>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(context.database.clone(), context.auth.clone());
    let session = service.register(request).await?;

    Ok(envelope(
        "User registered successfully",
        StatusCode::CREATED,
        json!(session),
    ))
}

/// POST /login
pub async fn handle_login(
    State(context): State<Arc<ApiContext>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(context.database.clone(), context.auth.clone());
    let session = service.login(request).await?;

    Ok(envelope(
        "Login successful",
        StatusCode::OK,
        json!({
            "tokens": session.tokens,
            "user": session.user,
        }),
    ))
}

/// POST /token/refresh
pub async fn handle_token_refresh(
    State(context): State<Arc<ApiContext>>,
    Json(request): Json<RefreshTokenRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(context.database.clone(), context.auth.clone());
    let access = service.refresh_access(&request)?;

    Ok(envelope(
        "Token refreshed successfully",
        StatusCode::OK,
        json!({ "access": access }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("user.name@example.co.uk"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ax.com"));
        assert!(!is_valid_email("a@"));
    }

    #[test]
    fn test_identity_field_validation() {
        assert!(validate_identity_fields("a@x.com", "alice", "secret123").is_ok());
        assert!(validate_identity_fields("bad", "alice", "secret123").is_err());
        assert!(validate_identity_fields("a@x.com", "  ", "secret123").is_err());
        assert!(validate_identity_fields("a@x.com", "alice", "short").is_err());
    }
}

// ABOUTME: Unified error handling with error codes and HTTP response formatting
// ABOUTME: Maps domain failures onto the uniform JSON response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! # Unified Error Handling
//!
//! Defines the error codes used across the account, rank, and token modules
//! and renders every failure as the uniform `{message, status, data}` JSON
//! envelope expected by API clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation & business rules (400)
    /// Malformed or missing request fields
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
    /// Email or username already registered
    #[serde(rename = "DUPLICATE_IDENTITY")]
    DuplicateIdentity,
    /// Rank name already registered
    #[serde(rename = "DUPLICATE_RANK")]
    DuplicateRank,
    /// Requested role outside the admin-creatable set
    #[serde(rename = "INVALID_ROLE")]
    InvalidRole,
    /// Approval requested for an already-approved account
    #[serde(rename = "ALREADY_APPROVED")]
    AlreadyApproved,

    // Authentication (401)
    /// Unknown username or wrong password
    #[serde(rename = "INVALID_CREDENTIALS")]
    InvalidCredentials,
    /// Account exists but has been deactivated
    #[serde(rename = "INACTIVE_ACCOUNT")]
    InactiveAccount,
    /// Missing, expired, or malformed bearer token
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,

    // Authorization (403)
    /// Authenticated but role-insufficient
    #[serde(rename = "FORBIDDEN")]
    Forbidden,

    // Resources (404)
    /// Referenced entity does not exist
    #[serde(rename = "NOT_FOUND")]
    NotFound,

    // Internal (500)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
    /// Database operation failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::DuplicateIdentity
            | Self::DuplicateRank
            | Self::InvalidRole
            | Self::AlreadyApproved => StatusCode::BAD_REQUEST,

            Self::InvalidCredentials | Self::InactiveAccount | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }

            Self::Forbidden => StatusCode::FORBIDDEN,

            Self::NotFound => StatusCode::NOT_FOUND,

            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ValidationError => "The provided input is invalid",
            Self::DuplicateIdentity => "An account with this identity already exists",
            Self::DuplicateRank => "A rank with this name already exists",
            Self::InvalidRole => "The requested role is not permitted",
            Self::AlreadyApproved => "The account is already approved",
            Self::InvalidCredentials => "The provided credentials are invalid",
            Self::InactiveAccount => "The account has been deactivated",
            Self::Unauthorized => "Authentication is required to access this resource",
            Self::Forbidden => "You do not have permission to perform this action",
            Self::NotFound => "The requested resource was not found",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message, returned to the client verbatim
    pub message: String,
    /// Structured detail attached to the response envelope's `data` field
    pub details: serde_json::Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Attach structured detail rendered into the envelope's `data` field
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Render the error as the uniform response envelope
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, "request failed: {}", self.message);
        }
        let body = json!({
            "message": self.message,
            "status": status.as_u16(),
            "data": self.details,
        });
        (status, Json(body)).into_response()
    }
}

/// Convenience constructors for common errors
impl AppError {
    /// Malformed or missing request fields
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Email or username collision
    pub fn duplicate_identity(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateIdentity, message)
    }

    /// Rank name collision
    pub fn duplicate_rank(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateRank, message)
    }

    /// Role outside the admin-creatable set
    #[must_use]
    pub fn invalid_role() -> Self {
        Self::new(ErrorCode::InvalidRole, "Invalid role")
    }

    /// Approval of an already-approved account
    #[must_use]
    pub fn already_approved() -> Self {
        Self::new(ErrorCode::AlreadyApproved, "User is already approved")
    }

    /// Login failure; the message never reveals which check failed
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, "Invalid credentials")
    }

    /// Deactivated account
    #[must_use]
    pub fn inactive_account() -> Self {
        Self::new(ErrorCode::InactiveAccount, "Account is inactive")
    }

    /// Missing/expired/malformed bearer token
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Authenticated but role-insufficient
    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(
            ErrorCode::Forbidden,
            "You are not authorized to perform this action",
        )
    }

    /// Referenced entity absent
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

/// Conversion from `anyhow::Error` for service-boundary fallthrough
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

/// Generic database errors; uniqueness conflicts are mapped at the query site
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::new(ErrorCode::DatabaseError, error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(
            ErrorCode::DuplicateIdentity.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::Forbidden.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_expired_token_maps_to_unauthorized() {
        // Expired and malformed tokens are both 401, never 403
        assert_eq!(
            ErrorCode::Unauthorized.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_app_error_display() {
        let error = AppError::not_found("User");
        assert_eq!(
            error.to_string(),
            "The requested resource was not found: User not found"
        );
    }

    #[test]
    fn test_details_default_to_null() {
        let error = AppError::forbidden();
        assert!(error.details.is_null());

        let error = AppError::validation("missing email").with_details(json!({"field": "email"}));
        assert_eq!(error.details["field"], "email");
    }
}

// ABOUTME: Bearer-token authentication middleware and role guards
// ABOUTME: Resolves access tokens into accounts and enforces the authorization policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! # Authentication Middleware
//!
//! Evaluates the authorization policy at the edge of every protected route.
//! A valid, non-expired access token must resolve to an active account;
//! anything less is `Unauthorized` (401). Role checks happen per handler via
//! the guards below and yield `Forbidden` (403) - the two outcomes are
//! deliberately distinct.

use crate::auth::TokenKind;
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::Account;
use crate::routes::ApiContext;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

/// The account resolved from the request's bearer token
///
/// Inserted as a request extension by [`require_auth`]; handlers behind the
/// authentication layer extract it to identify the caller.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    /// The authenticated account as loaded at request entry
    pub account: Account,
}

/// Authentication layer for protected routes
///
/// Extracts the bearer access token, validates it, and loads the account it
/// identifies. The resolved [`CurrentAccount`] is inserted as an extension
/// for downstream handlers.
///
/// # Errors
///
/// Returns `Unauthorized` if the header is missing or malformed, the token
/// fails validation or has expired, or the account no longer resolves;
/// `InactiveAccount` if the account has been deactivated.
pub async fn require_auth(
    State(context): State<Arc<ApiContext>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let Some(header) = auth_header else {
        tracing::warn!("Authentication failed: missing authorization header");
        return Err(AppError::unauthorized("Missing authorization header"));
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        tracing::warn!("Authentication failed: invalid authorization header format");
        return Err(AppError::unauthorized(
            "Invalid authorization header format - must be 'Bearer <token>'",
        ));
    };

    let claims = context
        .auth
        .validate_token(token, TokenKind::Access)
        .map_err(|e| {
            tracing::warn!("Access token rejected: {e}");
            AppError::unauthorized(error_messages::SESSION_EXPIRED)
        })?;

    let account_id = claims
        .account_id()
        .map_err(|_| AppError::unauthorized(error_messages::SESSION_EXPIRED))?;

    let account = context
        .database
        .get_account(account_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Access token for unknown account: {account_id}");
            AppError::unauthorized(error_messages::SESSION_EXPIRED)
        })?;

    if !account.is_active {
        tracing::warn!("Request blocked for inactive account: {}", account.username);
        return Err(AppError::inactive_account());
    }

    tracing::debug!(
        account.id = %account.id,
        account.role = %account.role,
        "Request authenticated"
    );

    request.extensions_mut().insert(CurrentAccount { account });
    Ok(next.run(request).await)
}

/// Admin-only guard
///
/// # Errors
///
/// Returns `Forbidden` unless the account's role is admin
pub fn require_admin(account: &Account) -> AppResult<()> {
    if account.role.is_admin() {
        Ok(())
    } else {
        tracing::warn!(
            "Admin operation denied for {} (role: {})",
            account.username,
            account.role
        );
        Err(AppError::forbidden())
    }
}

/// Staff-or-admin guard
///
/// # Errors
///
/// Returns `Forbidden` unless the account's role is staff or admin
pub fn require_staff_or_admin(account: &Account) -> AppResult<()> {
    if account.role.is_staff() {
        Ok(())
    } else {
        tracing::warn!(
            "Staff operation denied for {} (role: {})",
            account.username,
            account.role
        );
        Err(AppError::forbidden())
    }
}

// ABOUTME: HTTP route assembly and shared request-handling types
// ABOUTME: Builds the axum router and defines the uniform response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! # HTTP Routes
//!
//! Route assembly for the membership API. Handlers are thin adapters: they
//! translate HTTP requests into calls against the account store, token
//! issuer, and rank registry, and format every outcome as the uniform
//! `{message, status, data}` envelope.

pub mod auth;
pub mod health;
pub mod members;
pub mod ranks;

use crate::auth::AuthManager;
use crate::database::Database;
use crate::middleware::require_auth;
use crate::models::Account;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Shared context for all API endpoints
#[derive(Clone)]
pub struct ApiContext {
    /// Account and rank persistence
    pub database: Arc<Database>,
    /// Token issuer and validator
    pub auth: Arc<AuthManager>,
}

impl ApiContext {
    /// Create a new API context
    #[must_use]
    pub const fn new(database: Arc<Database>, auth: Arc<AuthManager>) -> Self {
        Self { database, auth }
    }
}

/// The uniform response envelope returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Human-readable outcome description
    pub message: String,
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Operation payload, or null
    pub data: serde_json::Value,
}

/// Build an enveloped JSON response
pub(crate) fn envelope(
    message: &str,
    status: StatusCode,
    data: serde_json::Value,
) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse {
            message: message.to_owned(),
            status: status.as_u16(),
            data,
        }),
    )
}

/// Sanitized account representation for API payloads
///
/// Never carries the password hash; the rank is exposed as its identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account ID
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
    /// Authorization tier
    pub role: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional display name
    pub full_name: Option<String>,
    /// Optional rank identifier
    pub rank: Option<i64>,
    /// Whether the account is usable
    pub is_active: bool,
    /// Whether the account has been approved
    pub is_approved: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            username: account.username.clone(),
            role: account.role.to_string(),
            phone: account.phone.clone(),
            full_name: account.full_name.clone(),
            rank: account.rank_id,
            is_active: account.is_active,
            is_approved: account.is_approved,
            created_at: account.created_at,
        }
    }
}

/// Create the full application router
#[must_use]
pub fn router(context: ApiContext) -> Router {
    let context = Arc::new(context);

    // Protected routes resolve the bearer token into a CurrentAccount;
    // role checks happen per handler
    let protected = protected_routes(context.clone()).layer(middleware::from_fn_with_state(
        context.clone(),
        require_auth,
    ));

    Router::new()
        .merge(public_routes(context))
        .merge(protected)
        .merge(health::HealthRoutes::routes())
}

/// Routes open to unauthenticated callers
fn public_routes(context: Arc<ApiContext>) -> Router {
    Router::new()
        .route("/register", post(auth::handle_register))
        .route("/login", post(auth::handle_login))
        .route("/token/refresh", post(auth::handle_token_refresh))
        .with_state(context)
}

/// Routes requiring an authenticated account
fn protected_routes(context: Arc<ApiContext>) -> Router {
    Router::new()
        .route("/create-user", post(members::handle_create_user))
        .route("/profile-detail", get(members::handle_profile_detail))
        .route("/profile-update", put(members::handle_profile_update))
        .route("/all-members", get(members::handle_all_members))
        .route("/approved-members", get(members::handle_approved_members))
        .route("/new-members", get(members::handle_new_members))
        .route("/approve-member", post(members::handle_approve_member))
        .route(
            "/ranks",
            post(ranks::handle_create_rank).get(ranks::handle_list_ranks),
        )
        .with_state(context)
}

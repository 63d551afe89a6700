// ABOUTME: Member management route handlers
// ABOUTME: Handles admin account creation, profile access, listings, and approval
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! Member lifecycle routes
//!
//! Admin-issued account creation, self-service profile access, the staff
//! member listings, and the approval workflow. Approval is one-directional:
//! once flipped, an account stays approved, and re-approval is rejected
//! rather than treated as an idempotent success.

use super::auth::{hash_password, validate_identity_fields};
use super::{envelope, AccountInfo, ApiContext};
use crate::errors::{AppError, AppResult};
use crate::middleware::{require_admin, require_staff_or_admin, CurrentAccount};
use crate::models::{Account, Role};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Admin-issued account creation request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Email address (unique)
    pub email: String,
    /// Username used for login (unique)
    pub username: String,
    /// Cleartext password, hashed before storage
    pub password: String,
    /// Requested role; only "admin" and "staff" are accepted here
    pub role: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional display name
    pub full_name: Option<String>,
    /// Optional rank identifier
    pub rank: Option<i64>,
}

/// Self-service profile update; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    /// New display name
    pub full_name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New rank identifier
    pub rank: Option<i64>,
}

/// Approval request naming the target account
#[derive(Debug, Deserialize)]
pub struct ApproveMemberRequest {
    /// ID of the account to approve
    pub user_id: String,
}

/// POST /create-user
///
/// Admin-only creation of staff and admin accounts. These bypass approval
/// gating entirely: the authorization policy never consults `is_approved`
/// for staff-level roles.
pub async fn handle_create_user(
    State(context): State<Arc<ApiContext>>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&current.account)?;

    let role = match request.role.as_str() {
        "admin" => Role::Admin,
        "staff" => Role::Staff,
        _ => return Err(AppError::invalid_role()),
    };

    validate_identity_fields(&request.email, &request.username, &request.password)?;

    if let Some(rank_id) = request.rank {
        context
            .database
            .get_rank(rank_id)
            .await?
            .ok_or_else(|| AppError::not_found("Rank"))?;
    }

    let password_hash = hash_password(&request.password)?;

    let mut account = Account::new(request.email, request.username, password_hash);
    account.role = role;
    account.phone = request.phone;
    account.full_name = request.full_name;
    account.rank_id = request.rank;

    context.database.create_account(&account).await?;

    tracing::info!(
        "{} account created: {} ({}) by {}",
        role,
        account.username,
        account.id,
        current.account.username
    );

    let mut role_name = role.to_string();
    if let Some(first) = role_name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    Ok(envelope(
        &format!("{role_name} created successfully"),
        StatusCode::CREATED,
        json!({ "user": AccountInfo::from(&account) }),
    ))
}

/// GET /profile-detail
pub async fn handle_profile_detail(
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<impl IntoResponse> {
    Ok(envelope(
        "Profile fetched successfully",
        StatusCode::OK,
        json!(AccountInfo::from(&current.account)),
    ))
}

/// PUT /profile-update
///
/// Self-service; only display name, phone, and rank reference are mutable.
/// Identity, role, and approval state are unreachable through this path
/// regardless of the caller's role.
pub async fn handle_profile_update(
    State(context): State<Arc<ApiContext>>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<ProfileUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let mut account = current.account;

    if let Some(rank_id) = request.rank {
        context
            .database
            .get_rank(rank_id)
            .await?
            .ok_or_else(|| AppError::not_found("Rank"))?;
        account.rank_id = Some(rank_id);
    }
    if let Some(full_name) = request.full_name {
        account.full_name = Some(full_name);
    }
    if let Some(phone) = request.phone {
        account.phone = Some(phone);
    }

    context.database.update_profile(&account).await?;

    tracing::info!("Profile updated for account: {}", account.id);

    Ok(envelope(
        "Profile updated successfully",
        StatusCode::OK,
        json!(AccountInfo::from(&account)),
    ))
}

/// GET /all-members
pub async fn handle_all_members(
    State(context): State<Arc<ApiContext>>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<impl IntoResponse> {
    require_staff_or_admin(&current.account)?;

    let members = context.database.list_accounts().await?;
    Ok(envelope(
        "All members fetched successfully",
        StatusCode::OK,
        accounts_json(&members),
    ))
}

/// GET /approved-members
pub async fn handle_approved_members(
    State(context): State<Arc<ApiContext>>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<impl IntoResponse> {
    require_staff_or_admin(&current.account)?;

    let members = context.database.list_accounts_by_approval(true).await?;
    Ok(envelope(
        "Approved members fetched successfully",
        StatusCode::OK,
        accounts_json(&members),
    ))
}

/// GET /new-members
pub async fn handle_new_members(
    State(context): State<Arc<ApiContext>>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<impl IntoResponse> {
    require_staff_or_admin(&current.account)?;

    let members = context.database.list_accounts_by_approval(true).await?;
    Ok(envelope(
        "New members fetched successfully",
        StatusCode::OK,
        accounts_json(&members),
    ))
}

/// POST /approve-member
///
/// Flips the target's approval flag false to true. Re-approving is a
/// business-rule rejection, not an idempotent success.
pub async fn handle_approve_member(
    State(context): State<Arc<ApiContext>>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<ApproveMemberRequest>,
) -> AppResult<impl IntoResponse> {
    require_staff_or_admin(&current.account)?;

    let target_id = Uuid::parse_str(&request.user_id)
        .map_err(|e| AppError::validation(format!("Invalid user ID format: {e}")))?;

    let target = context
        .database
        .get_account(target_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if target.is_approved {
        return Err(AppError::already_approved());
    }

    // The conditional update closes the race with a concurrent approval
    let changed = context.database.approve_account(target_id).await?;
    if !changed {
        return Err(AppError::already_approved());
    }

    tracing::info!(
        "Account {} approved by {}",
        target.username,
        current.account.username
    );

    Ok(envelope(
        "User profile approved successfully",
        StatusCode::OK,
        Value::Null,
    ))
}

fn accounts_json(accounts: &[Account]) -> Value {
    json!(accounts.iter().map(AccountInfo::from).collect::<Vec<_>>())
}

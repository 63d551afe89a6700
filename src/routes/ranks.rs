// ABOUTME: Rank registry route handlers
// ABOUTME: Handles rank creation and listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! Rank registry routes

use super::{envelope, ApiContext};
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::middleware::{require_admin, CurrentAccount};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Rank creation request
#[derive(Debug, Deserialize)]
pub struct CreateRankRequest {
    /// Unique rank name
    pub name: String,
}

/// POST /ranks
pub async fn handle_create_rank(
    State(context): State<Arc<ApiContext>>,
    Extension(current): Extension<CurrentAccount>,
    Json(request): Json<CreateRankRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&current.account)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Rank name must not be empty"));
    }
    if name.len() > limits::MAX_RANK_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Rank name must be at most {} characters",
            limits::MAX_RANK_NAME_LENGTH
        )));
    }

    let rank = context.database.create_rank(name).await?;

    tracing::info!("Rank created: {} ({})", rank.name, rank.id);

    Ok(envelope(
        "Rank created successfully",
        StatusCode::CREATED,
        json!({ "rank": rank }),
    ))
}

/// GET /ranks
pub async fn handle_list_ranks(
    State(context): State<Arc<ApiContext>>,
    Extension(_current): Extension<CurrentAccount>,
) -> AppResult<impl IntoResponse> {
    let ranks = context.database.list_ranks().await?;

    Ok(envelope(
        "Ranks fetched successfully",
        StatusCode::OK,
        json!(ranks),
    ))
}
